//! Render nodes.

use cgmath::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

use crate::host::ElementId;

/// RGB color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub red: u8,
    /// Green.
    pub green: u8,
    /// Blue.
    pub blue: u8,
}

impl Color {
    /// Creates a new `Color`.
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the color packed as `0xRRGGBB`.
    pub fn to_packed(self) -> u32 {
        u32::from(self.red) << 16 | u32::from(self.green) << 8 | u32::from(self.blue)
    }
}

/// Authored material with a persistent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// ID.
    pub id: ElementId,
    /// Persistent unique id.
    pub unique_id: String,
    /// Name.
    pub name: String,
    /// Color.
    pub color: Color,
    /// Transparency in percent, `0..=100`.
    #[serde(default)]
    pub transparency: u8,
    /// Shininess.
    #[serde(default = "default_shininess")]
    pub shininess: u32,
}

/// Returns the shininess of authored materials without an explicit value.
fn default_shininess() -> u32 {
    1
}

/// Material announced by the host ahead of polymeshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialNode {
    /// Authored material, if any.
    #[serde(default)]
    pub material_id: Option<ElementId>,
    /// Color.
    pub color: Color,
    /// Transparency in `[0.0, 1.0]`.
    #[serde(default)]
    pub transparency: f64,
    /// Glossiness.
    #[serde(default)]
    pub glossiness: u32,
}

/// Triangulated surface patch.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polymesh {
    /// Points, in the coordinate frame of the innermost instance.
    pub points: Vec<[f64; 3]>,
    /// Triangles as indices into `points`.
    pub facets: Vec<[usize; 3]>,
    /// Normals. Accepted but not exported.
    #[serde(default)]
    pub normals: Vec<[f64; 3]>,
    /// UV. Accepted but not exported.
    #[serde(default)]
    pub uvs: Vec<[f64; 2]>,
}

impl Polymesh {
    /// Returns an iterator of points.
    pub fn iter_points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.points.iter().map(|&p| Point3::from(p))
    }
}

/// View.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    /// View ID.
    pub id: ElementId,
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Level of detail.
    #[serde(default)]
    pub level_of_detail: u8,
}

/// Family instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Symbol ID.
    #[serde(default)]
    pub symbol_id: Option<ElementId>,
    /// Local transform, row-major.
    #[serde(default = "identity_row_major")]
    pub transform: [f64; 16],
}

impl InstanceNode {
    /// Returns the local transform.
    pub fn transform(&self) -> Matrix4<f64> {
        from_row_major(&self.transform)
    }
}

/// Linked document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkNode {
    /// Name.
    #[serde(default)]
    pub name: String,
    /// Title of the linked document.
    #[serde(default)]
    pub document_title: String,
    /// Local transform, row-major.
    #[serde(default = "identity_row_major")]
    pub transform: [f64; 16],
}

impl LinkNode {
    /// Returns the local transform.
    pub fn transform(&self) -> Matrix4<f64> {
        from_row_major(&self.transform)
    }
}

/// Returns the row-major identity.
fn identity_row_major() -> [f64; 16] {
    [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// Builds a matrix from row-major values.
pub(crate) fn from_row_major(m: &[f64; 16]) -> Matrix4<f64> {
    // `Matrix4::new` takes columns.
    Matrix4::new(
        m[0], m[4], m[8], m[12], //
        m[1], m[5], m[9], m[13], //
        m[2], m[6], m[10], m[14], //
        m[3], m[7], m[11], m[15],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use cgmath::{Transform, Vector3};

    #[test]
    fn packs_color() {
        assert_eq!(Color::new(0x80, 0x80, 0x80).to_packed(), 8_421_504);
        assert_eq!(Color::new(0xff, 0, 0).to_packed(), 0xff0000);
        assert_eq!(Color::new(0, 0, 0x01).to_packed(), 1);
    }

    #[test]
    fn reads_row_major_translation() {
        let node = InstanceNode {
            name: "door".to_owned(),
            symbol_id: None,
            transform: [
                1.0, 0.0, 0.0, 5.0, //
                0.0, 1.0, 0.0, 6.0, //
                0.0, 0.0, 1.0, 7.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        };
        assert_eq!(
            node.transform(),
            Matrix4::from_translation(Vector3::new(5.0, 6.0, 7.0))
        );
        assert_eq!(
            node.transform().transform_point(Point3::new(1.0, 1.0, 1.0)),
            Point3::new(6.0, 7.0, 8.0)
        );
    }
}
