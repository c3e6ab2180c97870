//! three.js (va3c) scene export for tessellated CAD/BIM models.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub use self::{
    cli_opt::CliOpt,
    export::{ExportOptions, SceneExporter},
};

mod cli_opt;
pub mod data;
pub mod export;
pub mod host;
pub mod properties;
pub mod serialize;
pub mod settings;
