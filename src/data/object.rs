//! Object node.

use cgmath::{Matrix4, SquareMatrix};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Object node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Scene root.
    Scene,
    /// Source element container.
    RevitElement,
    /// Per-material mesh leaf.
    Mesh,
}

/// Scene graph node.
///
/// Containers (`Scene`, `RevitElement`) own their children; leaves (`Mesh`)
/// refer to a geometry and a material by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectNode {
    /// Identity.
    pub uuid: String,
    /// Name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Kind.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Row-major 4x4 transform.
    pub matrix: [f64; 16],
    /// Children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ObjectNode>>,
    /// Geometry identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,
    /// Material identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    /// Exported element properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<IndexMap<String, String>>,
}

impl ObjectNode {
    /// Creates a container node.
    pub fn container(
        kind: ObjectKind,
        uuid: impl Into<String>,
        name: impl Into<String>,
        matrix: Matrix4<f64>,
    ) -> Self {
        Self {
            uuid: uuid.into(),
            name: Some(name.into()),
            kind,
            matrix: row_major(&matrix),
            children: Some(Vec::new()),
            geometry: None,
            material: None,
            user_data: None,
        }
    }

    /// Creates a mesh leaf sharing its identity with the geometry it wraps.
    pub fn mesh(geometry: impl Into<String>, material: impl Into<String>, name: &str) -> Self {
        let geometry = geometry.into();
        Self {
            uuid: geometry.clone(),
            name: Some(name.to_owned()),
            kind: ObjectKind::Mesh,
            matrix: row_major(&Matrix4::identity()),
            children: None,
            geometry: Some(geometry),
            material: Some(material.into()),
            user_data: None,
        }
    }

    /// Appends a child.
    ///
    /// Leaves have no child list; one is created on demand.
    pub fn push_child(&mut self, child: ObjectNode) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Returns an iterator of children.
    pub fn iter_children(&self) -> impl Iterator<Item = &ObjectNode> {
        self.children.iter().flatten()
    }
}

/// Flattens the matrix into row-major order.
pub(crate) fn row_major(m: &Matrix4<f64>) -> [f64; 16] {
    // cgmath stores columns; `m[c][r]`.
    let mut out = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            out[r * 4 + c] = m[c][r];
        }
    }
    out
}
