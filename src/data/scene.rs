//! Scene.

use serde::{Deserialize, Serialize};

use crate::data::{GeometryRecord, MaterialRecord, ObjectNode};

/// Format metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Format type, always `"Object"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Format version.
    pub version: f64,
    /// Generator.
    pub generator: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            kind: "Object".to_owned(),
            version: 4.3,
            generator: concat!("va3c-export ", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Finished scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Metadata.
    pub metadata: Metadata,
    /// Root node.
    pub object: ObjectNode,
    /// Geometries.
    pub geometries: Vec<GeometryRecord>,
    /// Materials.
    pub materials: Vec<MaterialRecord>,
}

impl SceneDocument {
    /// Returns the element nodes directly under the root.
    pub fn iter_elements(&self) -> impl Iterator<Item = &ObjectNode> {
        self.object.iter_children()
    }

    /// Returns a reference to the geometry with the given identity.
    pub fn geometry(&self, uuid: &str) -> Option<&GeometryRecord> {
        self.geometries.iter().find(|geo| geo.uuid == uuid)
    }

    /// Returns a reference to the material with the given identity.
    pub fn material(&self, uuid: &str) -> Option<&MaterialRecord> {
        self.materials.iter().find(|mat| mat.uuid == uuid)
    }
}
