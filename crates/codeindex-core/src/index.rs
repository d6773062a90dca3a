//! The emitted index documents.
//!
//! Struct field declaration order here *is* the canonical JSON field order;
//! the emitter serialises these types directly. All orderings are byte-wise
//! and total so output bytes are a function of the input set and the
//! profile, never of map iteration or scheduling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version stamped on every `SymbolIndex`.
pub const SYMBOL_INDEX_SCHEMA_VERSION: &str = "2.1";

/// Schema version stamped on every `ProjectIndex`.
pub const PROJECT_INDEX_SCHEMA_VERSION: &str = "2.3";

/// One textual appearance of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub file_id: String,
    pub line: u32,
    pub col_start: u32,
    pub col_end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_end: Option<usize>,
}

impl Occurrence {
    /// Total ordering key: `(file_id, line, col_start, col_end)`.
    pub fn sort_key(&self) -> (&str, u32, u32, u32) {
        (&self.file_id, self.line, self.col_start, self.col_end)
    }
}

/// Derived statistics for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolStats {
    pub occurrence_count: usize,
    /// Number of distinct `(file_id, line)` pairs among the occurrences.
    pub unique_line_count: usize,
}

/// One selected identifier with all its occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub identifier: String,
    pub occurrences: Vec<Occurrence>,
    pub stats: SymbolStats,
}

/// Per-file metadata for a successfully processed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub file_id: String,
    pub lines: u64,
    pub bytes: u64,
    pub sha256: String,
}

/// A recoverable problem recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file_id: String,
    pub line: u32,
    pub col: u32,
    pub message: String,
    pub code: String,
}

impl Diagnostic {
    /// File-level diagnostic with no meaningful position.
    pub fn file_level(severity: Severity, file_id: &str, code: &str, message: String) -> Self {
        Self {
            severity,
            file_id: file_id.to_string(),
            line: 0,
            col: 0,
            message,
            code: code.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// The index for one profile over one set of input files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolIndex {
    pub schema_version: String,
    pub profile_id: String,
    pub ordering: String,
    pub generated_at: String,
    pub files: Vec<FileSummary>,
    pub symbols: Vec<SymbolEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Wrapper for mixed-language runs: one embedded `SymbolIndex` per profile,
/// sorted by `profile_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIndex {
    pub schema_version: String,
    pub project_root: String,
    pub generated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_sha256: Option<String>,
    pub indexes: Vec<SymbolIndex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<BTreeMap<String, String>>,
    pub diagnostics: Vec<Diagnostic>,
}
