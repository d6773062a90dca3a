//! The indexing engine: multi-file aggregation into a canonical
//! `SymbolIndex`, plus `ProjectIndex` assembly for registry runs.
//!
//! Output bytes are a function of the sorted *set* of inputs and the
//! profile. Every ordering is an explicit byte-wise sort; nothing depends on
//! map iteration or the order inputs were supplied.

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use codeindex_core::{
    CodeIndexError, Diagnostic, FileSummary, LanguageProfile, Occurrence, ProjectIndex,
    QualifiedPolicy, Severity, SymbolEntry, SymbolIndex, SymbolMode, SymbolStats, Token,
    PROJECT_INDEX_SCHEMA_VERSION, SYMBOL_INDEX_SCHEMA_VERSION,
};

use crate::discovery::discover_declared;
use crate::lexer::CompiledProfile;

/// One input to an indexing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Where to read the bytes.
    pub path: PathBuf,
    /// Stable identifier within the index: root-relative `/`-separated path,
    /// or the basename when no root was given.
    pub file_id: String,
}

/// Effective options for a run. `None` fields defer to the profile's
/// `symbol_policy`, which in turn defers to built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub mode: Option<SymbolMode>,
    pub exclude_single_letter: Option<bool>,
    pub include_qualified: Option<QualifiedPolicy>,
    pub include_headers: Option<bool>,
    /// Injectable timestamp for reproducible output; defaults to now.
    pub generated_at: Option<String>,
    /// Record `byte_start`/`byte_end` on occurrences.
    pub byte_offsets: bool,
}

/// The fully resolved symbol-selection policy:
/// explicit option > profile `symbol_policy` > built-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub mode: SymbolMode,
    pub exclude_single_letter: bool,
    pub include_qualified: QualifiedPolicy,
    pub include_headers: bool,
}

impl ResolvedPolicy {
    pub fn resolve(profile: &LanguageProfile, options: &IndexOptions) -> Self {
        let base = profile.symbol_policy_or_default();
        Self {
            mode: options.mode.unwrap_or(base.mode),
            exclude_single_letter: options
                .exclude_single_letter
                .unwrap_or(base.exclude_single_letter_identifiers),
            include_qualified: options
                .include_qualified
                .unwrap_or(base.include_qualified_identifiers),
            include_headers: options
                .include_headers
                .unwrap_or(base.include_include_headers),
        }
    }
}

/// The current wall-clock timestamp in the emitted format.
pub fn default_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

struct LoadedFile {
    file_id: String,
    text: String,
    tokens: Vec<Token>,
}

/// Index a set of files sharing one profile.
///
/// File-level failures (unreadable file, undecodable bytes) become
/// diagnostics and the run completes; only configuration problems are
/// returned as errors.
pub fn index_files(
    profile: &LanguageProfile,
    inputs: &[SourceFile],
    options: &IndexOptions,
) -> Result<SymbolIndex, CodeIndexError> {
    let compiled = CompiledProfile::new(profile)?;
    let policy = ResolvedPolicy::resolve(profile, options);

    // The contract is over the sorted set of inputs: order-insensitive,
    // exact duplicates collapse, conflicting file_ids are rejected.
    let mut sorted: Vec<&SourceFile> = inputs.iter().collect();
    sorted.sort_by(|a, b| a.file_id.cmp(&b.file_id).then_with(|| a.path.cmp(&b.path)));
    sorted.dedup();
    for pair in sorted.windows(2) {
        if pair[0].file_id == pair[1].file_id {
            return Err(CodeIndexError::Config(format!(
                "file_id {:?} maps to both {} and {}",
                pair[0].file_id,
                pair[0].path.display(),
                pair[1].path.display()
            )));
        }
    }

    let mut files = Vec::new();
    let mut diagnostics = Vec::new();
    let mut loaded = Vec::new();

    for src in &sorted {
        let data = match std::fs::read(&src.path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", src.path.display());
                diagnostics.push(Diagnostic::file_level(
                    Severity::Error,
                    &src.file_id,
                    "io.read",
                    format!("cannot read {}: {e}", src.path.display()),
                ));
                continue;
            }
        };

        let text = match String::from_utf8_lossy(&data) {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => {
                diagnostics.push(Diagnostic::file_level(
                    Severity::Warning,
                    &src.file_id,
                    "text.encoding",
                    "invalid UTF-8 replaced with U+FFFD".to_string(),
                ));
                s
            }
        };

        files.push(FileSummary {
            file_id: src.file_id.clone(),
            lines: count_lines(&data),
            bytes: data.len() as u64,
            sha256: sha256_hex(&data),
        });

        let tokens: Vec<Token> = compiled.lexer(&text).collect();
        loaded.push(LoadedFile {
            file_id: src.file_id.clone(),
            text,
            tokens,
        });
    }

    // The admitted set is the union across all files of the run, so a
    // declaration in one file admits references in another.
    let mut allowed: BTreeSet<String> = BTreeSet::new();
    if policy.mode == SymbolMode::Declared {
        for file in &loaded {
            allowed.extend(discover_declared(&file.text, &file.tokens, &compiled, &policy));
        }
    }

    // key -> (first-seen spelling, occurrences). Files arrive in file_id
    // order and tokens in source order, so the first push per key is the
    // smallest occurrence.
    let mut occurrences: BTreeMap<String, (String, Vec<Occurrence>)> = BTreeMap::new();

    for file in &loaded {
        for tok in file.tokens.iter().filter(|t| t.is_identifier()) {
            let key = compiled.normalize(&tok.text);
            if compiled.is_stop_key(&key) {
                continue;
            }
            if policy.mode == SymbolMode::Declared && !allowed.contains(&key) {
                continue;
            }
            // Single-letter identifiers bypass the exclusion only when
            // explicitly admitted by declaration discovery.
            if policy.exclude_single_letter
                && tok.text.chars().count() == 1
                && !allowed.contains(&key)
            {
                continue;
            }

            let entry = occurrences
                .entry(key)
                .or_insert_with(|| (tok.text.clone(), Vec::new()));
            entry.1.push(Occurrence {
                file_id: file.file_id.clone(),
                line: tok.line,
                col_start: tok.col_start,
                col_end: tok.col_end,
                byte_start: options.byte_offsets.then_some(tok.byte_start),
                byte_end: options.byte_offsets.then_some(tok.byte_end),
            });
        }
    }

    let mut symbols: Vec<SymbolEntry> = occurrences
        .into_iter()
        .map(|(key, (spelling, mut occs))| {
            occs.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
            let stats = SymbolStats {
                occurrence_count: occs.len(),
                unique_line_count: unique_line_count(&occs),
            };
            let identifier = if compiled.preserve_spelling() { spelling } else { key };
            SymbolEntry {
                identifier,
                occurrences: occs,
                stats,
            }
        })
        .collect();
    symbols.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    tracing::info!(
        "Indexed {} file(s) with profile {}: {} symbol(s), {} diagnostic(s)",
        files.len(),
        profile.profile_id,
        symbols.len(),
        diagnostics.len(),
    );

    Ok(SymbolIndex {
        schema_version: SYMBOL_INDEX_SCHEMA_VERSION.to_string(),
        profile_id: profile.profile_id.clone(),
        ordering: "lex".to_string(),
        generated_at: options
            .generated_at
            .clone()
            .unwrap_or_else(default_timestamp),
        files,
        symbols,
        diagnostics,
    })
}

/// Number of distinct `(file_id, line)` pairs in a sorted occurrence list.
fn unique_line_count(occs: &[Occurrence]) -> usize {
    let mut count = 0;
    let mut last: Option<(&str, u32)> = None;
    for occ in occs {
        let key = (occ.file_id.as_str(), occ.line);
        if last != Some(key) {
            count += 1;
            last = Some(key);
        }
    }
    count
}

/// `0` for empty files, otherwise `1 + count('\n')`.
fn count_lines(data: &[u8]) -> u64 {
    if data.is_empty() {
        return 0;
    }
    1 + data.iter().filter(|&&b| b == b'\n').count() as u64
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

// ── Project Index ──────────────────────────────────────────────────────────

/// Options for wrapping per-profile indexes into one `ProjectIndex`.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub project_root: String,
    pub registry_id: Option<String>,
    pub generated_at: Option<String>,
    /// alias -> artifact file name, when per-profile files were written.
    pub artifacts: Option<BTreeMap<String, String>>,
}

/// Assemble a `ProjectIndex` from per-profile indexes and run-level
/// diagnostics. `indexes[]` is sorted by `profile_id`.
pub fn build_project_index(
    mut indexes: Vec<SymbolIndex>,
    diagnostics: Vec<Diagnostic>,
    options: &ProjectOptions,
) -> ProjectIndex {
    indexes.sort_by(|a, b| a.profile_id.cmp(&b.profile_id));
    let project_sha256 = project_fingerprint(&indexes);
    ProjectIndex {
        schema_version: PROJECT_INDEX_SCHEMA_VERSION.to_string(),
        project_root: options.project_root.clone(),
        generated_at: options
            .generated_at
            .clone()
            .unwrap_or_else(default_timestamp),
        engine_version: Some(env!("CARGO_PKG_VERSION").to_string()),
        registry_id: options.registry_id.clone(),
        project_sha256: Some(project_sha256),
        indexes,
        artifacts: options.artifacts.clone(),
        diagnostics,
    }
}

/// Deterministic project fingerprint: SHA-256 over the sorted
/// `"<file_id>:<sha256>\n"` lines of every indexed file.
fn project_fingerprint(indexes: &[SymbolIndex]) -> String {
    let mut lines: Vec<String> = indexes
        .iter()
        .flat_map(|index| {
            index
                .files
                .iter()
                .map(|f| format!("{}:{}\n", f.file_id, f.sha256))
        })
        .collect();
    lines.sort();
    let mut hasher = Sha256::new();
    for line in &lines {
        hasher.update(line.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeindex_core::{
        CaseSensitivity, CommentSyntax, IdentifierMode, IdentifierRule, LiteralSyntax,
        Normalization, NormalizationMode, StopWords, StopWordsMode, SymbolPolicy,
    };
    use std::path::Path;

    fn java_profile() -> LanguageProfile {
        LanguageProfile {
            profile_id: "java".into(),
            name: "Java".into(),
            version: None,
            case_sensitivity: CaseSensitivity::Sensitive,
            normalization: Normalization::default(),
            identifier_rule: IdentifierRule {
                mode: IdentifierMode::Regex,
                pattern: Some("[A-Za-z_][A-Za-z0-9_]*".into()),
            },
            stop_words: StopWords {
                mode: StopWordsMode::Inline,
                words: Some(
                    ["package", "class", "public", "static", "void", "String", "int"]
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                ),
                uri: None,
            },
            comment_syntax: CommentSyntax {
                line_comment_starts: vec!["//".into()],
                block_comment_starts: vec!["/*".into()],
                block_comment_ends: vec!["*/".into()],
            },
            literal_syntax: LiteralSyntax::default(),
            symbol_policy: None,
        }
    }

    fn write_inputs(dir: &Path, files: &[(&str, &str)]) -> Vec<SourceFile> {
        files
            .iter()
            .map(|(name, contents)| {
                let path = dir.join(name);
                std::fs::write(&path, contents).unwrap();
                SourceFile {
                    path,
                    file_id: name.to_string(),
                }
            })
            .collect()
    }

    fn declared_options() -> IndexOptions {
        IndexOptions {
            mode: Some(SymbolMode::Declared),
            generated_at: Some("2024-06-01T00:00:00Z".into()),
            ..IndexOptions::default()
        }
    }

    #[test]
    fn java_basic_declared_only() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[(
                "Hello.java",
                "package demo;\nclass Hello { public static void main(String[] args) { String x = \"y\"; } }\n",
            )],
        );

        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();

        let idents: Vec<&str> = index.symbols.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(idents, ["Hello", "args", "demo", "main", "x"]);

        let lines: Vec<u32> = index
            .symbols
            .iter()
            .map(|s| s.occurrences[0].line)
            .collect();
        assert_eq!(lines, [2, 2, 1, 2, 2]);

        for sym in &index.symbols {
            assert_eq!(sym.stats.occurrence_count, 1);
            assert_eq!(sym.stats.unique_line_count, 1);
        }
        assert_eq!(index.files.len(), 1);
        assert_eq!(index.files[0].lines, 3);
        assert!(index.diagnostics.is_empty());
    }

    #[test]
    fn tricky_comments_exclude_commented_declarations() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[("T.java", "int a = 1; // int b = 2\n/* int c = 3 */ int d = 4;\n")],
        );

        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        let idents: Vec<&str> = index.symbols.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(idents, ["a", "d"]);
    }

    #[test]
    fn multi_file_aggregation_unions_declarations() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[("A.java", "int foo;\n"), ("B.java", "foo;\n")],
        );

        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        assert_eq!(index.symbols.len(), 1);
        let sym = &index.symbols[0];
        assert_eq!(sym.identifier, "foo");
        assert_eq!(sym.stats.occurrence_count, 2);
        assert_eq!(sym.stats.unique_line_count, 2);
        assert_eq!(sym.occurrences[0].file_id, "A.java");
        assert_eq!(sym.occurrences[1].file_id, "B.java");
    }

    #[test]
    fn permutation_of_inputs_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[("A.java", "int foo; int bar;\n"), ("B.java", "foo; bar;\n")],
        );
        let mut reversed = inputs.clone();
        reversed.reverse();

        let profile = java_profile();
        let options = declared_options();
        let a = crate::emit::to_canonical_json(&index_files(&profile, &inputs, &options).unwrap())
            .unwrap();
        let b =
            crate::emit::to_canonical_json(&index_files(&profile, &reversed, &options).unwrap())
                .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("A.java", "int foo;\nfoo = 1;\n")]);
        let profile = java_profile();
        let options = declared_options();
        let a = index_files(&profile, &inputs, &options).unwrap();
        let b = index_files(&profile, &inputs, &options).unwrap();
        assert_eq!(
            crate::emit::to_canonical_json(&a).unwrap(),
            crate::emit::to_canonical_json(&b).unwrap()
        );
    }

    #[test]
    fn all_identifiers_is_a_superset_of_declared_only() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[("S.java", "int foo = compute();\nSystem.print(foo);\n")],
        );
        let profile = java_profile();

        let declared = index_files(&profile, &inputs, &declared_options()).unwrap();
        let mut all_options = declared_options();
        all_options.mode = Some(SymbolMode::All);
        let all = index_files(&profile, &inputs, &all_options).unwrap();

        for sym in &declared.symbols {
            let matching = all
                .symbols
                .iter()
                .find(|s| s.identifier == sym.identifier)
                .expect("declared symbol missing from all-identifiers run");
            assert!(matching.stats.occurrence_count >= sym.stats.occurrence_count);
        }
        assert!(all.symbols.len() >= declared.symbols.len());
    }

    #[test]
    fn stop_words_never_appear() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("S.java", "int int x; class class;\n")]);
        let profile = java_profile();
        let mut options = declared_options();
        options.mode = Some(SymbolMode::All);
        let index = index_files(&profile, &inputs, &options).unwrap();
        for sym in &index.symbols {
            assert!(!["int", "class", "String"].contains(&sym.identifier.as_str()));
        }
    }

    #[test]
    fn empty_file_contributes_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("Empty.java", "")]);
        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        assert_eq!(index.files[0].lines, 0);
        assert_eq!(index.files[0].bytes, 0);
        assert!(index.symbols.is_empty());
    }

    #[test]
    fn trailing_newline_changes_line_count() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(
            dir.path(),
            &[("a.java", "int x;"), ("b.java", "int x;\n")],
        );
        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        assert_eq!(index.files[0].lines, 1);
        assert_eq!(index.files[1].lines, 2);
    }

    #[test]
    fn unreadable_file_becomes_diagnostic_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut inputs = write_inputs(dir.path(), &[("A.java", "int foo;\n")]);
        inputs.push(SourceFile {
            path: dir.path().join("missing.java"),
            file_id: "missing.java".into(),
        });

        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        assert_eq!(index.files.len(), 1);
        assert_eq!(index.diagnostics.len(), 1);
        assert_eq!(index.diagnostics[0].code, "io.read");
        assert_eq!(index.diagnostics[0].severity, Severity::Error);
        assert_eq!(index.diagnostics[0].file_id, "missing.java");
    }

    #[test]
    fn invalid_utf8_is_replaced_with_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.java");
        std::fs::write(&path, b"int foo;\n\xFF\xFE\n").unwrap();
        let inputs = vec![SourceFile {
            path,
            file_id: "bad.java".into(),
        }];

        let index = index_files(&java_profile(), &inputs, &declared_options()).unwrap();
        assert_eq!(index.diagnostics.len(), 1);
        assert_eq!(index.diagnostics[0].code, "text.encoding");
        assert_eq!(index.symbols[0].identifier, "foo");
    }

    #[test]
    fn conflicting_file_ids_are_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.java"), "int x;\n").unwrap();
        std::fs::write(dir.path().join("b.java"), "int y;\n").unwrap();
        let inputs = vec![
            SourceFile {
                path: dir.path().join("a.java"),
                file_id: "same.java".into(),
            },
            SourceFile {
                path: dir.path().join("b.java"),
                file_id: "same.java".into(),
            },
        ];
        assert!(matches!(
            index_files(&java_profile(), &inputs, &declared_options()),
            Err(CodeIndexError::Config(_))
        ));
    }

    #[test]
    fn duplicate_inputs_collapse() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("A.java", "int foo;\n")]);
        let doubled = vec![inputs[0].clone(), inputs[0].clone()];
        let index = index_files(&java_profile(), &doubled, &declared_options()).unwrap();
        assert_eq!(index.files.len(), 1);
        assert_eq!(index.symbols[0].stats.occurrence_count, 1);
    }

    #[test]
    fn single_letter_exclusion_spares_declared_letters() {
        let dir = tempfile::tempdir().unwrap();
        // X is admitted by the class rule (which ignores length); q is not
        let inputs = write_inputs(dir.path(), &[("S.java", "class X; X; q;\n")]);
        let mut options = declared_options();
        options.mode = Some(SymbolMode::All);
        options.exclude_single_letter = Some(true);
        // all-identifiers mode runs no discovery, so no single letter survives
        let index = index_files(&java_profile(), &inputs, &options).unwrap();
        assert!(index.symbols.is_empty());

        // in declared mode the discovery pass admits X, so it bypasses the rule
        options.mode = Some(SymbolMode::Declared);
        let index = index_files(&java_profile(), &inputs, &options).unwrap();
        let idents: Vec<&str> = index.symbols.iter().map(|s| s.identifier.as_str()).collect();
        assert_eq!(idents, ["X"]);
        assert_eq!(index.symbols[0].stats.occurrence_count, 2);
    }

    #[test]
    fn byte_offsets_recorded_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("S.java", "foo\n")]);
        let mut options = declared_options();
        options.mode = Some(SymbolMode::All);
        options.byte_offsets = true;
        let index = index_files(&java_profile(), &inputs, &options).unwrap();
        let occ = &index.symbols[0].occurrences[0];
        assert_eq!(occ.byte_start, Some(0));
        assert_eq!(occ.byte_end, Some(3));
    }

    #[test]
    fn case_insensitive_profile_folds_spellings() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("S.java", "Foo; foo; FOO;\n")]);
        let mut profile = java_profile();
        profile.case_sensitivity = CaseSensitivity::Insensitive;
        profile.normalization = Normalization {
            mode: NormalizationMode::LowercaseAscii,
            preserve_original_spelling: false,
        };
        let mut options = declared_options();
        options.mode = Some(SymbolMode::All);
        let index = index_files(&profile, &inputs, &options).unwrap();
        assert_eq!(index.symbols.len(), 1);
        assert_eq!(index.symbols[0].identifier, "foo");
        assert_eq!(index.symbols[0].stats.occurrence_count, 3);

        // preserve_original_spelling keeps the first-seen spelling
        profile.normalization.preserve_original_spelling = true;
        let index = index_files(&profile, &inputs, &options).unwrap();
        assert_eq!(index.symbols[0].identifier, "Foo");
    }

    #[test]
    fn profile_symbol_policy_applies_when_options_silent() {
        let dir = tempfile::tempdir().unwrap();
        let inputs = write_inputs(dir.path(), &[("S.java", "int foo; bar();\n")]);
        let mut profile = java_profile();
        profile.symbol_policy = Some(SymbolPolicy {
            mode: SymbolMode::Declared,
            ..SymbolPolicy::default()
        });
        let options = IndexOptions {
            generated_at: Some("2024-06-01T00:00:00Z".into()),
            ..IndexOptions::default()
        };
        let index = index_files(&profile, &inputs, &options).unwrap();
        let idents: Vec<&str> = index.symbols.iter().map(|s| s.identifier.as_str()).collect();
        // bar admitted by the (foo, bar) adjacent pair; explicit override wins
        assert_eq!(idents, ["bar", "foo"]);

        let mut override_options = options.clone();
        override_options.mode = Some(SymbolMode::All);
        let index = index_files(&profile, &inputs, &override_options).unwrap();
        assert_eq!(index.symbols.len(), 2);
    }

    #[test]
    fn project_index_sorts_by_profile_id() {
        let make = |id: &str| SymbolIndex {
            schema_version: SYMBOL_INDEX_SCHEMA_VERSION.into(),
            profile_id: id.into(),
            ordering: "lex".into(),
            generated_at: "2024-06-01T00:00:00Z".into(),
            files: vec![],
            symbols: vec![],
            diagnostics: vec![],
        };
        let project = build_project_index(
            vec![make("java"), make("cpp")],
            vec![],
            &ProjectOptions {
                project_root: "src".into(),
                generated_at: Some("2024-06-01T00:00:00Z".into()),
                ..ProjectOptions::default()
            },
        );
        let ids: Vec<&str> = project.indexes.iter().map(|i| i.profile_id.as_str()).collect();
        assert_eq!(ids, ["cpp", "java"]);
        assert_eq!(project.schema_version, PROJECT_INDEX_SCHEMA_VERSION);
        assert!(project.project_sha256.is_some());
    }

    #[test]
    fn count_lines_matches_contract() {
        assert_eq!(count_lines(b""), 0);
        assert_eq!(count_lines(b"a"), 1);
        assert_eq!(count_lines(b"a\n"), 2);
        assert_eq!(count_lines(b"a\nb\n"), 3);
    }
}
