//! Scene graph export.
//!
//! [`SceneExporter`] consumes the host traversal and builds one
//! `RevitElement` node per element, with one `Mesh` child and one geometry
//! per material the element uses.

use anyhow::{anyhow, bail, Context};
use cgmath::{Matrix4, SquareMatrix};
use indexmap::IndexMap;
use log::{debug, error, trace, warn};

use crate::{
    data::{GeometryRecord, ObjectKind, ObjectNode, SceneDocument},
    host::{
        ElementId, ExportContext, HostDocument, InstanceNode, LinkNode, MaterialNode, Polymesh,
        RenderNodeAction, ViewNode,
    },
    properties::{self, PropertyFilter},
};

pub use self::{
    material_registry::{ad_hoc_identity, MaterialRegistry},
    quantize::{quantize, QuantizedPoint, FEET_TO_MM},
    session::ExportSession,
    transform_stack::TransformStack,
    vertex_table::VertexTable,
};

mod material_registry;
mod quantize;
mod session;
mod transform_stack;
mod vertex_table;

/// User data key holding the element's unique id.
pub const ELEMENT_UID_KEY: &str = "revit_id";

/// Export options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Uniform scale of the root node.
    pub model_scale: f64,
    /// Scale applied to every emitted vertex coordinate (millimetres).
    pub vertex_scale: f64,
    /// Convert to a Y-up frame: negate X, swap Y and Z.
    pub switch_axes: bool,
    /// Export type-level properties prefixed `"Type "`.
    pub include_type_properties: bool,
    /// Restricts exported properties per category.
    pub property_filter: Option<PropertyFilter>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            model_scale: 1.0,
            vertex_scale: 1.0,
            switch_axes: true,
            include_type_properties: true,
            property_filter: None,
        }
    }
}

/// Mesh data accumulated for one material of the current element.
#[derive(Debug)]
struct MaterialMesh {
    /// Welded vertices.
    vertices: VertexTable,
    /// Triangle records, `[0, a, b, c]` each.
    faces: Vec<u32>,
    /// Whether any polymesh arrived for this material.
    touched: bool,
}

/// Transient state of the element being traversed.
#[derive(Debug)]
struct ElementState {
    /// ID.
    id: ElementId,
    /// Unique id.
    uid: String,
    /// Description, used for the element node and its meshes.
    name: String,
    /// Meshes by material identity, in first-use order.
    meshes: IndexMap<String, MaterialMesh>,
    /// Material applying to the following polymeshes.
    current_material: Option<String>,
}

impl ElementState {
    /// Makes the given material current, creating its mesh on first use.
    fn set_material(&mut self, uuid: &str) {
        if !self.meshes.contains_key(uuid) {
            trace!("New material for element {:?}: {:?}", self.id, uuid);
            self.meshes.insert(
                uuid.to_owned(),
                MaterialMesh {
                    vertices: VertexTable::new(),
                    faces: Vec::new(),
                    touched: false,
                },
            );
        }
        self.current_material = Some(uuid.to_owned());
    }
}

/// Scene graph exporter driven by a host traversal.
#[derive(Debug)]
pub struct SceneExporter<'a, D: ?Sized> {
    /// Host model.
    doc: &'a D,
    /// Options.
    options: ExportOptions,
    /// Session, between `start` and `finish`.
    session: Option<ExportSession>,
    /// Finished document.
    document: Option<SceneDocument>,
    /// Composed instance/link transforms.
    transforms: TransformStack,
    /// Elements entered and not yet left, innermost last.
    ///
    /// Skipped elements hold `None` so that every end callback pops exactly
    /// the entry its begin callback pushed.
    element_stack: Vec<Option<ElementState>>,
}

impl<'a, D: HostDocument + ?Sized> SceneExporter<'a, D> {
    /// Creates a new `SceneExporter`.
    pub fn new(doc: &'a D, options: ExportOptions) -> Self {
        Self {
            doc,
            options,
            session: None,
            document: None,
            transforms: TransformStack::new(),
            element_stack: Vec::new(),
        }
    }

    /// Returns the transform stack.
    pub fn transforms(&self) -> &TransformStack {
        &self.transforms
    }

    /// Returns the finished document.
    pub fn document(&self) -> Option<&SceneDocument> {
        self.document.as_ref()
    }

    /// Returns the finished document, consuming the exporter.
    pub fn into_document(self) -> anyhow::Result<SceneDocument> {
        self.document
            .ok_or_else(|| anyhow!("Export has not finished: no document available"))
    }

    /// Returns the running session.
    fn session_mut(&mut self) -> anyhow::Result<&mut ExportSession> {
        self.session
            .as_mut()
            .ok_or_else(|| anyhow!("Traversal callback outside start/finish"))
    }

    /// Returns the innermost element, or fails for callbacks outside one.
    fn current_mut(&mut self, callback: &str) -> anyhow::Result<&mut ElementState> {
        self.element_stack
            .last_mut()
            .and_then(Option::as_mut)
            .ok_or_else(|| anyhow!("{} callback outside of an element", callback))
    }

    /// Returns whether the element with the given uid is recorded or open.
    fn is_known_element(&self, uid: &str) -> bool {
        let recorded = self
            .session
            .as_ref()
            .map_or(false, |session| session.contains_element(uid));
        recorded
            || self
                .element_stack
                .iter()
                .flatten()
                .any(|state| state.uid == uid)
    }

    /// Decides whether to export the element, building its initial state.
    fn enter_element(&mut self, id: ElementId) -> Option<ElementState> {
        let doc = self.doc;
        let e = match doc.element(id) {
            Some(e) => e,
            None => {
                warn!("Skipping unknown element {:?}", id);
                return None;
            }
        };
        if self.is_known_element(&e.unique_id) {
            debug!("Skipping duplicate element {:?}", id);
            return None;
        }
        let category = match &e.category {
            Some(category) => category,
            None => {
                debug!("Skipping element without category {:?}", id);
                return None;
            }
        };
        let session = match self.session.as_mut() {
            Some(session) => session,
            None => {
                warn!("Skipping element {:?} outside start/finish", id);
                return None;
            }
        };

        debug!(
            "Element begin: id={:?}, category={:?}, depth={}",
            id,
            category.name,
            self.element_stack.len()
        );
        let mut state = ElementState {
            id,
            uid: e.unique_id.clone(),
            name: properties::describe(e),
            meshes: IndexMap::new(),
            current_material: None,
        };
        if let Some(material) = category.material.and_then(|mid| doc.material(mid)) {
            let uuid = session.materials_mut().resolve_authored(material);
            state.set_material(uuid);
        }

        Some(state)
    }

    /// Resolves the material identity for a material node.
    fn resolve_material(&mut self, node: &MaterialNode) -> anyhow::Result<String> {
        let doc = self.doc;
        let authored = node.material_id.and_then(|id| {
            let material = doc.material(id);
            if material.is_none() {
                warn!("Unknown authored material {:?}, using node color", id);
            }
            material
        });
        let registry = self.session_mut()?.materials_mut();
        let uuid = match authored {
            Some(material) => registry.resolve_authored(material),
            None => registry.resolve_ad_hoc(node.color, node.transparency, node.glossiness),
        };
        Ok(uuid.to_owned())
    }

    /// Flushes the element's meshes and records the element node.
    fn flush_element(&mut self, state: ElementState) -> anyhow::Result<()> {
        let doc = self.doc;
        let element = doc
            .element(state.id)
            .ok_or_else(|| anyhow!("Element {:?} disappeared during traversal", state.id))?;
        let mut user_data = properties::collect(
            doc,
            element,
            self.options.include_type_properties,
            self.options.property_filter.as_ref(),
        );
        user_data.insert(ELEMENT_UID_KEY.to_owned(), state.uid.clone());

        let mut node = ObjectNode::container(
            ObjectKind::RevitElement,
            state.uid.as_str(),
            state.name.as_str(),
            Matrix4::identity(),
        );
        node.user_data = Some(user_data);

        let vertex_scale = self.options.vertex_scale;
        let session = self.session_mut()?;
        for (material, mesh) in state.meshes {
            if !mesh.touched {
                trace!("No geometry for material {:?} of {:?}", material, state.id);
                continue;
            }
            let uuid = format!("{}-{}", state.uid, material);
            let geometry = GeometryRecord::new(
                uuid.as_str(),
                mesh.vertices.flatten(vertex_scale),
                mesh.faces,
            );
            session.add_geometry(geometry);
            node.push_child(ObjectNode::mesh(uuid, material, &state.name));
        }
        session.add_element(node);

        Ok(())
    }
}

impl<'a, D: HostDocument + ?Sized> ExportContext for SceneExporter<'a, D> {
    fn start(&mut self) -> anyhow::Result<bool> {
        if self.session.is_some() || self.document.is_some() {
            bail!("Export already started");
        }
        self.transforms = TransformStack::new();
        self.element_stack.clear();
        self.session = Some(ExportSession::start(
            self.doc.title(),
            self.doc.active_view_uid(),
            self.options.model_scale,
        ));
        Ok(true)
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        let session = self
            .session
            .take()
            .ok_or_else(|| anyhow!("Finish without start"))?;
        if !self.element_stack.is_empty() {
            error!(
                "Finishing with {} unterminated elements; their geometry is dropped",
                self.element_stack.len()
            );
            self.element_stack.clear();
        }
        if self.transforms.depth() != 1 {
            error!(
                "Finishing with unbalanced transforms: depth={}",
                self.transforms.depth()
            );
        }
        self.document = Some(session.finish());
        Ok(())
    }

    fn on_view_begin(&mut self, view: &ViewNode) -> RenderNodeAction {
        debug!(
            "View begin: id={:?}, name={:?}, lod={}",
            view.id, view.name, view.level_of_detail
        );
        RenderNodeAction::Proceed
    }

    fn on_view_end(&mut self, id: ElementId) {
        debug!("View end: id={:?}", id);
    }

    fn on_element_begin(&mut self, id: ElementId) -> RenderNodeAction {
        let state = self.enter_element(id);
        let action = if state.is_some() {
            RenderNodeAction::Proceed
        } else {
            RenderNodeAction::Skip
        };
        self.element_stack.push(state);

        action
    }

    fn on_element_end(&mut self, id: ElementId) -> anyhow::Result<()> {
        let state = match self.element_stack.pop() {
            Some(Some(state)) => state,
            Some(None) => {
                trace!("Element end for skipped element {:?}", id);
                return Ok(());
            }
            None => bail!("Element end without matching begin: id={:?}", id),
        };
        if state.id != id {
            bail!(
                "Unbalanced element callbacks: end of {:?} while {:?} is open",
                id,
                state.id
            );
        }
        debug!("Element end: id={:?}, materials={}", id, state.meshes.len());
        self.flush_element(state)
            .with_context(|| format!("Failed to record element {:?}", id))
    }

    fn on_instance_begin(&mut self, node: &InstanceNode) -> RenderNodeAction {
        debug!(
            "Instance begin: name={:?}, symbol={:?}",
            node.name, node.symbol_id
        );
        self.transforms.push(node.transform());
        RenderNodeAction::Proceed
    }

    fn on_instance_end(&mut self) -> anyhow::Result<()> {
        trace!("Instance end");
        self.transforms.pop().map(drop)
    }

    fn on_link_begin(&mut self, node: &LinkNode) -> RenderNodeAction {
        debug!(
            "Link begin: name={:?}, document={:?}",
            node.name, node.document_title
        );
        self.transforms.push(node.transform());
        RenderNodeAction::Proceed
    }

    fn on_link_end(&mut self) -> anyhow::Result<()> {
        trace!("Link end");
        self.transforms.pop().map(drop)
    }

    fn on_material(&mut self, node: &MaterialNode) -> anyhow::Result<()> {
        self.current_mut("Material")?;
        let uuid = self.resolve_material(node)?;
        self.current_mut("Material")?.set_material(&uuid);
        Ok(())
    }

    fn on_polymesh(&mut self, mesh: &Polymesh) -> anyhow::Result<()> {
        let switch_axes = self.options.switch_axes;
        let points = mesh
            .iter_points()
            .map(|p| quantize(self.transforms.apply_to_point(p), switch_axes))
            .collect::<Vec<_>>();

        let state = self.current_mut("Polymesh")?;
        let material = state
            .current_material
            .clone()
            .ok_or_else(|| anyhow!("Polymesh for element {:?} without material", state.id))?;
        let target = state
            .meshes
            .get_mut(&material)
            .ok_or_else(|| anyhow!("No mesh for current material {:?}", material))?;
        target.touched = true;

        let mut dropped = 0;
        for facet in &mesh.facets {
            let corners = match (
                points.get(facet[0]),
                points.get(facet[1]),
                points.get(facet[2]),
            ) {
                (Some(&a), Some(&b), Some(&c)) => [a, b, c],
                _ => {
                    dropped += 1;
                    continue;
                }
            };
            target.faces.push(0);
            for p in corners {
                let index = target.vertices.insert(p);
                target.faces.push(index);
            }
        }
        if dropped > 0 {
            warn!(
                "Dropped {} facets with out-of-range points: points={}",
                dropped,
                points.len()
            );
        }
        trace!(
            "Polymesh: points={}, facets={}, vertices={}",
            mesh.points.len(),
            mesh.facets.len(),
            target.vertices.len()
        );

        Ok(())
    }

    fn on_face_begin(&mut self, name: &str) -> anyhow::Result<RenderNodeAction> {
        bail!(
            "Face callback received ({:?}); the host must exclude faces",
            name
        )
    }

    fn on_face_end(&mut self, name: &str) -> anyhow::Result<()> {
        bail!(
            "Face callback received ({:?}); the host must exclude faces",
            name
        )
    }

    fn on_light(&mut self, name: &str) {
        debug!("Ignoring light: {:?}", name);
    }

    fn on_rpc(&mut self, name: &str) {
        debug!("Ignoring RPC: {:?}", name);
    }
}
