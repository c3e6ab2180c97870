//! va3c exporter.

use anyhow::Context;
use clap::Parser;
use log::info;
use va3c_export::{
    host::replay::{self, RecordedTraversal, ReplayStatus},
    properties::PropertyFilter,
    serialize,
    settings::UserSettings,
    CliOpt, ExportOptions, SceneExporter,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("version: {}", env!("CARGO_PKG_VERSION"));

    let opt = CliOpt::parse();
    run(&opt)
}

/// Exports the traversal named on the command line.
fn run(opt: &CliOpt) -> anyhow::Result<()> {
    let pretty = match (opt.pretty_override(), &opt.settings) {
        (Some(pretty), _) => pretty,
        (None, Some(path)) => UserSettings::load(path)?.json_indented,
        (None, None) => UserSettings::default().json_indented,
    };
    let property_filter = opt
        .filter
        .as_ref()
        .map(PropertyFilter::load)
        .transpose()?;
    let options = ExportOptions {
        model_scale: opt.model_scale,
        vertex_scale: opt.vertex_scale,
        switch_axes: !opt.no_switch_axes,
        include_type_properties: !opt.no_type_properties,
        property_filter,
    };

    let traversal = RecordedTraversal::load(&opt.traversal)?;
    let mut exporter = SceneExporter::new(&traversal.document, options);
    let status = replay::replay(&traversal.events, &mut exporter)
        .with_context(|| format!("Failed to export {}", opt.traversal.display()))?;
    if status != ReplayStatus::Completed {
        anyhow::bail!("Export did not complete: {:?}", status);
    }
    let doc = exporter.into_document()?;
    serialize::write(&doc, &opt.output, pretty)?;

    Ok(())
}
