//! Element properties exported into `userData`.

use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::Context;
use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::host::{Element, HostDocument, Parameter};

/// Prefix of type-level property names.
pub const TYPE_PREFIX: &str = "Type ";

/// Approved property names per category.
///
/// Type-level names carry the [`TYPE_PREFIX`].
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyFilter {
    /// Approved names by category name.
    approved: HashMap<String, HashSet<String>>,
}

impl PropertyFilter {
    /// Creates a new empty `PropertyFilter`, which approves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a filter from a JSON object of category name to name list.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read property filter {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse property filter {}", path.display()))
    }

    /// Approves a property name for a category.
    pub fn approve(&mut self, category: impl Into<String>, name: impl Into<String>) {
        self.approved
            .entry(category.into())
            .or_default()
            .insert(name.into());
    }

    /// Returns the approved names for the category, if it is listed.
    fn category(&self, category: &str) -> Option<&HashSet<String>> {
        self.approved.get(category)
    }
}

/// Returns a description of the element for display.
///
/// The format is `"{class} {category }{family }{symbol }<{id} {name}>"`;
/// the symbol is omitted when it equals the element name.
pub fn describe(e: &Element) -> String {
    let category = e
        .category
        .as_ref()
        .map_or_else(String::new, |c| format!("{} ", c.name));
    let family = e
        .family_name
        .as_ref()
        .map_or_else(String::new, |f| format!("{} ", f));
    let symbol = match &e.symbol_name {
        Some(s) if e.family_name.is_some() && *s != e.name => format!("{} ", s),
        _ => String::new(),
    };

    format!(
        "{} {}{}{}<{} {}>",
        e.class_name, category, family, symbol, e.id.0, e.name
    )
}

/// Collects the element's non-empty property values.
///
/// Instance parameters come first, then the type parameters prefixed with
/// [`TYPE_PREFIX`] when `include_type` is set. The first value for a name
/// wins. With a filter, only approved names of the element's category are
/// kept, and elements of unlisted categories export nothing.
pub fn collect<D: HostDocument + ?Sized>(
    doc: &D,
    e: &Element,
    include_type: bool,
    filter: Option<&PropertyFilter>,
) -> IndexMap<String, String> {
    let approved = match filter {
        Some(filter) => {
            let category = e.category.as_ref().map(|c| c.name.as_str());
            match category.and_then(|c| filter.category(c)) {
                Some(names) => Some(names),
                None => {
                    trace!("Category not in property filter: element={:?}", e.id);
                    return IndexMap::new();
                }
            }
        }
        None => None,
    };

    let mut props = IndexMap::with_capacity(e.parameters.len());
    add_parameters(&mut props, "", &e.parameters, approved);

    if include_type {
        if let Some(typ) = e.type_id.and_then(|id| doc.element(id)) {
            add_parameters(&mut props, TYPE_PREFIX, &typ.parameters, approved);
        }
    }

    props
}

/// Adds the non-empty, approved parameters not yet present.
fn add_parameters(
    props: &mut IndexMap<String, String>,
    prefix: &str,
    parameters: &[Parameter],
    approved: Option<&HashSet<String>>,
) {
    for p in parameters {
        let key = format!("{}{}", prefix, p.name);
        if props.contains_key(&key) {
            continue;
        }
        if approved.map_or(false, |names| !names.contains(&key)) {
            continue;
        }
        match p.value.as_deref() {
            Some(value) if !value.is_empty() => {
                props.insert(key, value.to_owned());
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::host::{replay::RecordedDocument, Category, ElementId};

    fn param(name: &str, value: Option<&str>) -> Parameter {
        Parameter {
            name: name.to_owned(),
            value: value.map(ToOwned::to_owned),
        }
    }

    fn wall() -> Element {
        Element {
            id: ElementId(322634),
            unique_id: "wall-uid".to_owned(),
            name: "Generic - 200mm".to_owned(),
            class_name: "Wall".to_owned(),
            category: Some(Category {
                name: "Walls".to_owned(),
                material: None,
            }),
            family_name: None,
            symbol_name: None,
            type_id: Some(ElementId(10)),
            parameters: vec![
                param("Length", Some("4000")),
                param("Comments", Some("")),
                param("Mark", None),
                param("Length", Some("duplicate")),
                param("Structural", Some("No")),
            ],
        }
    }

    fn wall_type() -> Element {
        Element {
            id: ElementId(10),
            unique_id: "wall-type-uid".to_owned(),
            name: "Generic - 200mm".to_owned(),
            class_name: "WallType".to_owned(),
            category: None,
            family_name: None,
            symbol_name: None,
            type_id: None,
            parameters: vec![param("Width", Some("200")), param("Cost", None)],
        }
    }

    fn doc() -> RecordedDocument {
        RecordedDocument {
            title: "wall.rvt".to_owned(),
            active_view_uid: "view".to_owned(),
            elements: vec![wall(), wall_type()],
            materials: Vec::new(),
        }
    }

    #[test]
    fn describes_plain_element() {
        assert_eq!(describe(&wall()), "Wall Walls <322634 Generic - 200mm>");
    }

    #[test]
    fn describes_family_instance() {
        let mut e = wall();
        e.class_name = "FamilyInstance".to_owned();
        e.name = "0915 x 2134mm".to_owned();
        e.family_name = Some("Single-Flush".to_owned());
        e.symbol_name = Some("0762 x 2032mm".to_owned());
        assert_eq!(
            describe(&e),
            "FamilyInstance Walls Single-Flush 0762 x 2032mm <322634 0915 x 2134mm>"
        );
        e.symbol_name = Some(e.name.clone());
        assert_eq!(
            describe(&e),
            "FamilyInstance Walls Single-Flush <322634 0915 x 2134mm>"
        );
    }

    #[test]
    fn collects_non_empty_values_first_wins() {
        let props = collect(&doc(), &wall(), false, None);
        let keys: Vec<_> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Length", "Structural"]);
        assert_eq!(props["Length"], "4000");
    }

    #[test]
    fn prefixes_type_properties() {
        let props = collect(&doc(), &wall(), true, None);
        assert_eq!(props.get("Type Width").map(String::as_str), Some("200"));
        assert!(!props.contains_key("Type Cost"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn filter_keeps_approved_names() {
        let mut filter = PropertyFilter::new();
        filter.approve("Walls", "Structural");
        filter.approve("Walls", "Type Width");
        let props = collect(&doc(), &wall(), true, Some(&filter));
        let keys: Vec<_> = props.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Structural", "Type Width"]);
    }

    #[test]
    fn filter_without_category_exports_nothing() {
        let mut filter = PropertyFilter::new();
        filter.approve("Doors", "Structural");
        assert!(collect(&doc(), &wall(), true, Some(&filter)).is_empty());
    }

    #[test]
    fn filter_parses_from_json() {
        let filter: PropertyFilter =
            serde_json::from_str(r#"{ "Walls": ["Length", "Type Width"] }"#).unwrap();
        let props = collect(&doc(), &wall(), true, Some(&filter));
        assert_eq!(props.len(), 2);
    }
}
