//! Recorded traversal replay.
//!
//! A recorded traversal is a host document snapshot plus the callback
//! sequence the host would deliver. Replaying it drives any
//! [`ExportContext`] exactly like the live host would, including subtree
//! suppression after `Skip`.

use std::{fs, path::Path};

use anyhow::{bail, Context};
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::host::{
    Element, ElementId, ExportContext, HostDocument, InstanceNode, LinkNode, Material,
    MaterialNode, Polymesh, RenderNodeAction, ViewNode,
};

/// Host document snapshot.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDocument {
    /// Title.
    pub title: String,
    /// Unique id of the exported view.
    pub active_view_uid: String,
    /// Elements and element types.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Authored materials.
    #[serde(default)]
    pub materials: Vec<Material>,
}

impl HostDocument for RecordedDocument {
    fn title(&self) -> &str {
        &self.title
    }

    fn active_view_uid(&self) -> &str {
        &self.active_view_uid
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn material(&self, id: ElementId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }
}

/// One host callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraversalEvent {
    /// View begin.
    ViewBegin(ViewNode),
    /// View end.
    ViewEnd {
        /// View ID.
        id: ElementId,
    },
    /// Element begin.
    ElementBegin {
        /// Element ID.
        id: ElementId,
    },
    /// Element end.
    ElementEnd {
        /// Element ID.
        id: ElementId,
    },
    /// Instance begin.
    InstanceBegin(InstanceNode),
    /// Instance end.
    InstanceEnd,
    /// Link begin.
    LinkBegin(LinkNode),
    /// Link end.
    LinkEnd,
    /// Material.
    Material(MaterialNode),
    /// Polymesh.
    Polymesh(Polymesh),
    /// Face begin.
    FaceBegin {
        /// Face name.
        name: String,
    },
    /// Face end.
    FaceEnd {
        /// Face name.
        name: String,
    },
    /// Light.
    Light {
        /// Name.
        name: String,
    },
    /// RPC.
    Rpc {
        /// Name.
        name: String,
    },
}

/// Recorded traversal.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTraversal {
    /// Document.
    pub document: RecordedDocument,
    /// Callbacks in delivery order.
    pub events: Vec<TraversalEvent>,
}

impl RecordedTraversal {
    /// Loads a recorded traversal from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        debug!("Loading recorded traversal: path={}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read traversal {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse traversal {}", path.display()))
    }
}

/// How a replay ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// Every event was processed and the context finished.
    Completed,
    /// The context asked to stop; it was still finished.
    Cancelled,
    /// The context declined to start.
    Declined,
}

/// Kind of an open begin/end scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    /// View.
    View(ElementId),
    /// Element.
    Element(ElementId),
    /// Instance.
    Instance,
    /// Link.
    Link,
    /// Face.
    Face,
}

/// Open scope.
#[derive(Debug, Clone, Copy)]
struct Scope {
    /// Kind.
    kind: ScopeKind,
    /// Whether the begin callback was delivered.
    delivered: bool,
}

/// Replays the events into the context.
pub fn replay<C: ExportContext + ?Sized>(
    events: &[TraversalEvent],
    ctx: &mut C,
) -> anyhow::Result<ReplayStatus> {
    if !ctx.start()? {
        info!("Export context declined to start");
        return Ok(ReplayStatus::Declined);
    }

    let mut scopes: Vec<Scope> = Vec::new();
    // Index of the scope whose begin returned `Skip`.
    let mut skipped_at: Option<usize> = None;
    let mut status = ReplayStatus::Completed;

    for (index, event) in events.iter().enumerate() {
        if ctx.is_cancelled() {
            info!("Replay cancelled at event {}", index);
            status = ReplayStatus::Cancelled;
            break;
        }
        trace!("Replaying event {}: {:?}", index, event);
        let live = skipped_at.is_none();

        match event {
            TraversalEvent::ViewBegin(view) => {
                let action = live.then(|| ctx.on_view_begin(view));
                open(&mut scopes, &mut skipped_at, ScopeKind::View(view.id), action);
            }
            TraversalEvent::ElementBegin { id } => {
                let action = live.then(|| ctx.on_element_begin(*id));
                open(&mut scopes, &mut skipped_at, ScopeKind::Element(*id), action);
            }
            TraversalEvent::InstanceBegin(node) => {
                let action = live.then(|| ctx.on_instance_begin(node));
                open(&mut scopes, &mut skipped_at, ScopeKind::Instance, action);
            }
            TraversalEvent::LinkBegin(node) => {
                let action = live.then(|| ctx.on_link_begin(node));
                open(&mut scopes, &mut skipped_at, ScopeKind::Link, action);
            }
            TraversalEvent::FaceBegin { name } => {
                let action = if live {
                    Some(ctx.on_face_begin(name)?)
                } else {
                    None
                };
                open(&mut scopes, &mut skipped_at, ScopeKind::Face, action);
            }
            TraversalEvent::ViewEnd { id } => {
                if close(&mut scopes, &mut skipped_at, ScopeKind::View(*id))? {
                    ctx.on_view_end(*id);
                }
            }
            TraversalEvent::ElementEnd { id } => {
                if close(&mut scopes, &mut skipped_at, ScopeKind::Element(*id))? {
                    ctx.on_element_end(*id)?;
                }
            }
            TraversalEvent::InstanceEnd => {
                if close(&mut scopes, &mut skipped_at, ScopeKind::Instance)? {
                    ctx.on_instance_end()?;
                }
            }
            TraversalEvent::LinkEnd => {
                if close(&mut scopes, &mut skipped_at, ScopeKind::Link)? {
                    ctx.on_link_end()?;
                }
            }
            TraversalEvent::FaceEnd { name } => {
                if close(&mut scopes, &mut skipped_at, ScopeKind::Face)? {
                    ctx.on_face_end(name)?;
                }
            }
            TraversalEvent::Material(node) if live => ctx.on_material(node)?,
            TraversalEvent::Polymesh(mesh) if live => ctx.on_polymesh(mesh)?,
            TraversalEvent::Light { name } if live => ctx.on_light(name),
            TraversalEvent::Rpc { name } if live => ctx.on_rpc(name),
            _ => trace!("Suppressed event {} inside skipped subtree", index),
        }
    }

    if status == ReplayStatus::Completed && !scopes.is_empty() {
        bail!(
            "Traversal ended with {} unterminated scopes: {:?}",
            scopes.len(),
            scopes.iter().map(|s| s.kind).collect::<Vec<_>>()
        );
    }
    ctx.finish()?;

    Ok(status)
}

/// Opens a scope. `action` is `None` when the begin was not delivered.
fn open(
    scopes: &mut Vec<Scope>,
    skipped_at: &mut Option<usize>,
    kind: ScopeKind,
    action: Option<RenderNodeAction>,
) {
    if action == Some(RenderNodeAction::Skip) {
        trace!("Skipping subtree of {:?}", kind);
        *skipped_at = Some(scopes.len());
    }
    scopes.push(Scope {
        kind,
        delivered: action.is_some(),
    });
}

/// Closes a scope, returning whether the end callback is to be delivered.
fn close(
    scopes: &mut Vec<Scope>,
    skipped_at: &mut Option<usize>,
    kind: ScopeKind,
) -> anyhow::Result<bool> {
    let scope = match scopes.pop() {
        Some(scope) => scope,
        None => bail!("End of {:?} without matching begin", kind),
    };
    if scope.kind != kind {
        bail!(
            "Unbalanced traversal: end of {:?} while {:?} is open",
            kind,
            scope.kind
        );
    }
    if *skipped_at == Some(scopes.len()) {
        *skipped_at = None;
    }

    Ok(scope.delivered)
}
