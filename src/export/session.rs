//! Scene document assembly.

use cgmath::Matrix4;
use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    data::{GeometryRecord, Metadata, ObjectKind, ObjectNode, SceneDocument},
    export::material_registry::MaterialRegistry,
};

/// Export session: owns everything the document is built from.
///
/// Created by [`start`](Self::start), populated during traversal, and
/// frozen into a [`SceneDocument`] by [`finish`](Self::finish).
#[derive(Debug)]
pub struct ExportSession {
    /// Metadata.
    metadata: Metadata,
    /// Root node, without children until `finish`.
    root: ObjectNode,
    /// Geometries by identity.
    geometries: IndexMap<String, GeometryRecord>,
    /// Element nodes by element uid.
    elements: IndexMap<String, ObjectNode>,
    /// Materials.
    materials: MaterialRegistry,
}

impl ExportSession {
    /// Starts a session for the given document.
    ///
    /// `model_scale` becomes the uniform scale of the root node.
    pub fn start(title: &str, view_uid: &str, model_scale: f64) -> Self {
        debug!("Starting export session: title={:?}, view={:?}", title, view_uid);
        let root = ObjectNode::container(
            ObjectKind::Scene,
            view_uid,
            format!("BIM {}", title),
            Matrix4::from_scale(model_scale),
        );
        Self {
            metadata: Metadata::default(),
            root,
            geometries: IndexMap::new(),
            elements: IndexMap::new(),
            materials: MaterialRegistry::new(),
        }
    }

    /// Returns the material registry.
    pub fn materials_mut(&mut self) -> &mut MaterialRegistry {
        &mut self.materials
    }

    /// Registers a finished geometry.
    pub fn add_geometry(&mut self, geometry: GeometryRecord) {
        debug!(
            "Adding geometry: uuid={:?}, vertices={}, triangles={}",
            geometry.uuid,
            geometry.vertex_count(),
            geometry.triangle_count()
        );
        self.geometries.insert(geometry.uuid.clone(), geometry);
    }

    /// Registers a finished element node.
    pub fn add_element(&mut self, element: ObjectNode) {
        debug!("Adding element: uuid={:?}, name={:?}", element.uuid, element.name);
        self.elements.insert(element.uuid.clone(), element);
    }

    /// Returns whether the element with the given uid was already recorded.
    pub fn contains_element(&self, uuid: &str) -> bool {
        self.elements.contains_key(uuid)
    }

    /// Freezes the session into a document.
    pub fn finish(self) -> SceneDocument {
        let Self {
            metadata,
            mut root,
            geometries,
            elements,
            materials,
        } = self;
        info!(
            "Finished export session: elements={}, geometries={}, materials={}",
            elements.len(),
            geometries.len(),
            materials.len()
        );
        root.children = Some(elements.into_values().collect());

        SceneDocument {
            metadata,
            object: root,
            geometries: geometries.into_values().collect(),
            materials: materials.into_records(),
        }
    }
}
