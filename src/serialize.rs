//! JSON output.

use std::{
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::data::SceneDocument;

/// Renders the document as JSON text.
///
/// `pretty` selects two-space indentation; otherwise the output is compact.
pub fn to_string(doc: &SceneDocument, pretty: bool) -> anyhow::Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    text.context("Failed to serialize scene document")
}

/// Writes the document as JSON to the writer.
pub fn to_writer<W: Write>(mut writer: W, doc: &SceneDocument, pretty: bool) -> anyhow::Result<()> {
    let res = if pretty {
        serde_json::to_writer_pretty(&mut writer, doc)
    } else {
        serde_json::to_writer(&mut writer, doc)
    };
    res.context("Failed to serialize scene document")?;
    writer.flush().context("Failed to flush JSON output")
}

/// Writes the document as JSON to the file at `path`.
///
/// The output goes to a temporary file in the same directory, which then
/// replaces `path`. On failure `path` is left as it was.
pub fn write(doc: &SceneDocument, path: impl AsRef<Path>, pretty: bool) -> anyhow::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).with_context(|| {
        format!("Failed to create a temporary file in {}", dir.display())
    })?;
    debug!("Writing scene via {}", file.path().display());
    to_writer(BufWriter::new(file.as_file_mut()), doc, pretty)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    info!("Wrote scene: path={}, pretty={}", path.display(), pretty);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::export::ExportSession;

    fn empty() -> SceneDocument {
        ExportSession::start("empty.rvt", "view", 1.0).finish()
    }

    #[test]
    fn compact_has_no_whitespace_layout() {
        let text = to_string(&empty(), false).unwrap();
        assert!(!text.contains('\n'));
        assert!(text.starts_with(r#"{"metadata":{"type":"Object","version":4.3"#));
    }

    #[test]
    fn pretty_indents_two_spaces() {
        let text = to_string(&empty(), true).unwrap();
        assert!(text.contains("\n  \"metadata\": {\n    \"type\": \"Object\""));
    }

    #[test]
    fn omits_absent_fields() {
        let text = to_string(&empty(), false).unwrap();
        assert!(!text.contains("null"));
        assert!(!text.contains("userData"));
    }

    #[test]
    fn writer_matches_string() {
        let doc = empty();
        let mut buf = Vec::new();
        to_writer(&mut buf, &doc, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), to_string(&doc, true).unwrap());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.js");
        assert!(write(&empty(), &path, false).is_err());
    }

    #[test]
    fn replaces_existing_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.js");
        std::fs::write(&path, "x".repeat(10_000)).unwrap();

        write(&empty(), &path, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, to_string(&empty(), false).unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn failed_replace_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let path = dir.path().join("out.js");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "kept").unwrap();

        assert!(write(&empty(), &path, true).is_err());
        assert!(path.is_dir());
        assert_eq!(std::fs::read_to_string(path.join("keep")).unwrap(), "kept");
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, [std::ffi::OsString::from("out.js")]);
    }
}
