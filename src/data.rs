//! three.js object-format document data.

pub use self::{
    geometry::{GeometryData, GeometryRecord},
    material::MaterialRecord,
    object::{ObjectKind, ObjectNode},
    scene::{Metadata, SceneDocument},
};

mod geometry;
mod material;
mod object;
mod scene;
