//! Host traversal interface.
//!
//! The host engine walks its render tree depth-first and drives an
//! [`ExportContext`] through begin/end pairs:
//!
//! ```text
//! start
//!   view begin
//!     element begin
//!       instance/link begin (nested arbitrarily)
//!         material, polymesh, polymesh, material, polymesh ...
//!       instance/link end
//!     element end
//!   view end
//! finish
//! ```
//!
//! End callbacks are delivered even for nodes whose begin callback returned
//! [`RenderNodeAction::Skip`]; only the subtree in between is suppressed.

pub use self::{
    element::{Category, Element, ElementId, Parameter},
    render::{Color, InstanceNode, LinkNode, Material, MaterialNode, Polymesh, ViewNode},
};

mod element;
mod render;
pub mod replay;

/// Answer to a begin callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderNodeAction {
    /// Traverse the subtree.
    Proceed,
    /// Skip the subtree. The matching end callback still fires.
    Skip,
}

/// Model lookups the exporter needs while traversing.
pub trait HostDocument {
    /// Returns the document title.
    fn title(&self) -> &str;

    /// Returns the unique id of the exported view.
    fn active_view_uid(&self) -> &str;

    /// Returns the element (or element type) with the given id.
    fn element(&self, id: ElementId) -> Option<&Element>;

    /// Returns the authored material with the given id.
    fn material(&self, id: ElementId) -> Option<&Material>;
}

/// Callback protocol implemented by an exporter.
pub trait ExportContext {
    /// Called once before traversal. Returning `false` aborts the export.
    fn start(&mut self) -> anyhow::Result<bool>;

    /// Called once after traversal.
    fn finish(&mut self) -> anyhow::Result<()>;

    /// Polled by the host between callbacks.
    fn is_cancelled(&self) -> bool {
        false
    }

    /// Enters a view.
    fn on_view_begin(&mut self, view: &ViewNode) -> RenderNodeAction;

    /// Leaves a view.
    fn on_view_end(&mut self, id: ElementId);

    /// Enters an element.
    fn on_element_begin(&mut self, id: ElementId) -> RenderNodeAction;

    /// Leaves an element.
    fn on_element_end(&mut self, id: ElementId) -> anyhow::Result<()>;

    /// Enters a family instance.
    fn on_instance_begin(&mut self, node: &InstanceNode) -> RenderNodeAction;

    /// Leaves a family instance.
    fn on_instance_end(&mut self) -> anyhow::Result<()>;

    /// Enters a linked document.
    fn on_link_begin(&mut self, node: &LinkNode) -> RenderNodeAction;

    /// Leaves a linked document.
    fn on_link_end(&mut self) -> anyhow::Result<()>;

    /// Sets the material for the following polymeshes.
    fn on_material(&mut self, node: &MaterialNode) -> anyhow::Result<()>;

    /// Receives a tessellated surface patch.
    fn on_polymesh(&mut self, mesh: &Polymesh) -> anyhow::Result<()>;

    /// Enters a face. Only delivered when the host includes faces.
    fn on_face_begin(&mut self, name: &str) -> anyhow::Result<RenderNodeAction>;

    /// Leaves a face.
    fn on_face_end(&mut self, name: &str) -> anyhow::Result<()>;

    /// Receives a light.
    fn on_light(&mut self, _name: &str) {}

    /// Receives an RPC (rich photorealistic content) node.
    fn on_rpc(&mut self, _name: &str) {}
}
