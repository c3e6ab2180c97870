//! CLI options.

use std::path::PathBuf;

use clap::Parser;

/// CLI options.
#[derive(Debug, Parser)]
#[command(version, about = "Exports a recorded render traversal to a three.js JSON scene")]
pub struct CliOpt {
    /// Recorded traversal (JSON)
    pub traversal: PathBuf,
    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,
    /// User settings file (`JsonIndent = true/false`)
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Property filter (JSON object of category name to property names)
    #[arg(long)]
    pub filter: Option<PathBuf>,
    /// Indent the JSON output, overriding the settings
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,
    /// Write compact JSON, overriding the settings
    #[arg(long)]
    pub compact: bool,
    /// Keep the source axes instead of converting to Y-up
    #[arg(long)]
    pub no_switch_axes: bool,
    /// Uniform scale of the scene root
    #[arg(long, default_value_t = 1.0)]
    pub model_scale: f64,
    /// Scale applied to every vertex coordinate (millimetres)
    #[arg(long, default_value_t = 1.0)]
    pub vertex_scale: f64,
    /// Do not export type properties
    #[arg(long)]
    pub no_type_properties: bool,
}

impl CliOpt {
    /// Returns the indentation choice forced on the command line.
    pub fn pretty_override(&self) -> Option<bool> {
        if self.pretty {
            Some(true)
        } else if self.compact {
            Some(false)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_arguments() {
        let opt = CliOpt::try_parse_from(["va3c-export", "wall.json", "-o", "wall.js"]).unwrap();
        assert_eq!(opt.traversal, PathBuf::from("wall.json"));
        assert_eq!(opt.output, PathBuf::from("wall.js"));
        assert_eq!(opt.pretty_override(), None);
        assert_eq!(opt.model_scale, 1.0);
        assert!(!opt.no_switch_axes);
    }

    #[test]
    fn pretty_and_compact_conflict() {
        let res = CliOpt::try_parse_from(["va3c-export", "a", "-o", "b", "--pretty", "--compact"]);
        assert!(res.is_err());
        let opt = CliOpt::try_parse_from(["va3c-export", "a", "-o", "b", "--compact"]).unwrap();
        assert_eq!(opt.pretty_override(), Some(false));
    }
}
