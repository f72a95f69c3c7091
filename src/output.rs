/// Output document assembly and writing.
///
/// The document is rendered through `serde_json::Value`, whose objects are
/// ordered maps, so keys come out sorted at every nesting level regardless
/// of field order in the Rust types or in the source payload. Two-space
/// indentation, UTF-8 written verbatim, trailing newline.

use crate::model::{EnrichedReading, OutputDocument};
use std::fs;
use std::io;
use std::path::Path;

/// Assembles the document for one run. `stations` should already be sorted.
pub fn build_document(
    source: &str,
    fetched_at_utc: &str,
    stations: Vec<EnrichedReading>,
) -> OutputDocument {
    OutputDocument {
        source: source.to_string(),
        fetched_at_utc: fetched_at_utc.to_string(),
        count: stations.len(),
        stations,
    }
}

/// Renders the document to its final text form.
pub fn render_document(doc: &OutputDocument) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(doc)?;
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

/// Renders and writes the document, creating parent directories as needed
/// and replacing any previous file.
///
/// Rendering happens before anything touches the filesystem, so a
/// serialization failure leaves the previous file in place.
pub fn write_document(doc: &OutputDocument, path: &Path) -> io::Result<()> {
    let text = render_document(doc).map_err(io::Error::other)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;

    tracing::info!(path = %path.display(), stations = doc.count, "wrote output document");
    Ok(())
}
