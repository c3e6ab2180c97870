//! Geometry.

use serde::{Deserialize, Serialize};

/// Geometry record, one per (element, material) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    /// Identity, `"{element uid}-{material id}"`.
    pub uuid: String,
    /// Geometry type, always `"Geometry"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Geometry data.
    pub data: GeometryData,
}

impl GeometryRecord {
    /// Creates a new `GeometryRecord` from the flattened buffers.
    pub fn new(uuid: impl Into<String>, vertices: Vec<f64>, faces: Vec<u32>) -> Self {
        Self {
            uuid: uuid.into(),
            kind: "Geometry".to_owned(),
            data: GeometryData {
                vertices,
                faces,
                ..Default::default()
            },
        }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.data.vertices.len() / 3
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.data.faces.len() / 4
    }
}

/// Geometry data.
///
/// `faces` holds four integers per triangle: a type tag of `0` followed by
/// three vertex indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryData {
    /// Vertex coordinates, XYZ triples.
    pub vertices: Vec<f64>,
    /// Normals. Never populated.
    pub normals: Vec<f64>,
    /// UV. Never populated.
    pub uvs: Vec<f64>,
    /// Triangle records.
    pub faces: Vec<u32>,
    /// Scale.
    pub scale: f64,
    /// Visibility.
    pub visible: bool,
    /// Whether the geometry casts shadows.
    pub cast_shadow: bool,
    /// Whether the geometry receives shadows.
    pub receive_shadow: bool,
    /// Whether both sides are rendered.
    pub double_sided: bool,
}

impl Default for GeometryData {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            faces: Vec::new(),
            scale: 1.0,
            visible: true,
            cast_shadow: true,
            receive_shadow: false,
            double_sided: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case_keys() {
        let geo = GeometryRecord::new("e-m", vec![0.0, 1.0, 2.0], vec![0, 0, 0, 0]);
        let value = serde_json::to_value(&geo).unwrap();
        assert_eq!(value["type"], "Geometry");
        assert_eq!(value["data"]["castShadow"], true);
        assert_eq!(value["data"]["receiveShadow"], false);
        assert_eq!(value["data"]["doubleSided"], true);
        assert_eq!(value["data"]["normals"], serde_json::json!([]));
        assert_eq!(geo.vertex_count(), 1);
        assert_eq!(geo.triangle_count(), 1);
    }
}
