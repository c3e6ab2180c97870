//! Elements.

use serde::{Deserialize, Serialize};

/// Element ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub i64);

/// Category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Name.
    pub name: String,
    /// Default material.
    #[serde(default)]
    pub material: Option<ElementId>,
}

/// Element parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Definition name.
    pub name: String,
    /// Formatted value: the string itself for string parameters, the
    /// display string otherwise.
    #[serde(default)]
    pub value: Option<String>,
}

/// Element (or element type) as seen by the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// ID.
    pub id: ElementId,
    /// Persistent unique id.
    pub unique_id: String,
    /// Name.
    pub name: String,
    /// Host class name, e.g. `Wall` or `FamilyInstance`.
    pub class_name: String,
    /// Category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Family name, for family instances.
    #[serde(default)]
    pub family_name: Option<String>,
    /// Symbol (family type) name, for family instances.
    #[serde(default)]
    pub symbol_name: Option<String>,
    /// Element type.
    #[serde(default)]
    pub type_id: Option<ElementId>,
    /// Parameters, in host order.
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}
