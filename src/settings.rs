//! User settings.
//!
//! The settings file is plain text holding one entry, `JsonIndent = true`.
//! A missing file is created with the default.

use std::{fs, path::Path};

use anyhow::Context;
use log::{info, warn};

/// Settings key for JSON indentation.
const JSON_INDENT: &str = "JsonIndent";

/// User settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSettings {
    /// Whether to indent the JSON output.
    pub json_indented: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            json_indented: true,
        }
    }
}

impl UserSettings {
    /// Loads the settings, creating the file with defaults if missing.
    ///
    /// Unreadable entries fall back to compact output with a warning.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            let defaults = Self::default();
            fs::write(path, defaults.to_text())
                .with_context(|| format!("Failed to create settings file {}", path.display()))?;
            info!("Created a new user settings file at {}", path.display());
            return Ok(defaults);
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Ok(Self::parse(&text).unwrap_or_else(|| {
            warn!(
                "Invalid settings in {}: {:?}; expected {} = true or false",
                path.display(),
                text,
                JSON_INDENT
            );
            Self {
                json_indented: false,
            }
        }))
    }

    /// Parses the settings text.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = &text[text.find(JSON_INDENT)? + JSON_INDENT.len()..];
        let value = &rest[rest.find('=')? + 1..];
        let json_indented = parse_bool(value.lines().next()?.trim())?;

        Some(Self { json_indented })
    }

    /// Returns the settings as file text.
    pub fn to_text(self) -> String {
        format!(
            "{}={}",
            JSON_INDENT,
            if self.json_indented { "True" } else { "False" }
        )
    }
}

/// Parses a boolean tolerantly.
///
/// Accepts `true`/`false` in any case, `1`/`0`, and anything starting with
/// `t`, `y`, `f`, or `n`.
pub fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") || s == "1" {
        return Some(true);
    }
    if s.eq_ignore_ascii_case("false") || s == "0" {
        return Some(false);
    }
    match s.chars().next()?.to_ascii_lowercase() {
        't' | 'y' => Some(true),
        'f' | 'n' => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tolerant_booleans() {
        for s in ["true", "TRUE", "1", "yes", "Y", "t"] {
            assert_eq!(parse_bool(s), Some(true), "{:?}", s);
        }
        for s in ["false", "False", "0", "no", "N", "f"] {
            assert_eq!(parse_bool(s), Some(false), "{:?}", s);
        }
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn parses_settings_text() {
        assert_eq!(
            UserSettings::parse("JsonIndent=False"),
            Some(UserSettings {
                json_indented: false
            })
        );
        assert_eq!(
            UserSettings::parse("# exporter\nJsonIndent = yes\n"),
            Some(UserSettings {
                json_indented: true
            })
        );
        assert_eq!(UserSettings::parse("Indent=true"), None);
        assert_eq!(UserSettings::parse("JsonIndent true"), None);
        assert_eq!(UserSettings::parse("JsonIndent = perhaps"), None);
    }

    #[test]
    fn text_round_trips() {
        for json_indented in [true, false] {
            let settings = UserSettings { json_indented };
            assert_eq!(UserSettings::parse(&settings.to_text()), Some(settings));
        }
    }

    #[test]
    fn load_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.txt");

        let settings = UserSettings::load(&path).unwrap();
        assert!(settings.json_indented);
        assert_eq!(fs::read_to_string(&path).unwrap(), "JsonIndent=True");

        fs::write(&path, "JsonIndent=garbage").unwrap();
        assert!(!UserSettings::load(&path).unwrap().json_indented);
    }
}
