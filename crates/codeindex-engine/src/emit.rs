//! Canonical JSON emission.
//!
//! Two-space indentation, one property per line, struct-declaration field
//! order, non-ASCII verbatim, and a trailing newline. Identical documents
//! serialise to identical bytes on every platform.

use serde::Serialize;
use std::path::Path;

use codeindex_core::CodeIndexError;

/// Serialise a document to its canonical JSON text.
pub fn to_canonical_json<T: Serialize>(value: &T) -> Result<String, CodeIndexError> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Write a document to disk in canonical form, creating parent directories.
pub fn write_canonical_json<T: Serialize>(value: &T, path: &Path) -> Result<(), CodeIndexError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, to_canonical_json(value)?)?;
    Ok(())
}
