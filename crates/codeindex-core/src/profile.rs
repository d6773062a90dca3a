//! Language profiles: the complete lexical specification of a language, as data.
//!
//! A profile is loaded once per run from JSON (comments and trailing commas
//! tolerated) and is immutable afterwards. It drives the lexer (identifier
//! shape, comment and literal syntax), the stop-word filter, and the
//! symbol-selection policy.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{jsonc, CodeIndexError};

/// Lexical rules for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Unique identifier for this profile (e.g. "java", "cpp17").
    pub profile_id: String,
    /// Human-readable name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub case_sensitivity: CaseSensitivity,
    #[serde(default)]
    pub normalization: Normalization,
    pub identifier_rule: IdentifierRule,
    #[serde(default)]
    pub stop_words: StopWords,
    #[serde(default)]
    pub comment_syntax: CommentSyntax,
    #[serde(default)]
    pub literal_syntax: LiteralSyntax,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_policy: Option<SymbolPolicy>,
}

impl LanguageProfile {
    /// Load a profile from a JSON file, tolerating `//` comments and
    /// trailing commas. Structural problems are configuration errors.
    pub fn load(path: &Path) -> Result<Self, CodeIndexError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodeIndexError::Profile(format!("cannot read {}: {e}", path.display()))
        })?;
        let profile: LanguageProfile = jsonc::from_str(&text).map_err(|e| {
            CodeIndexError::Profile(format!("malformed profile {}: {e}", path.display()))
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Structural validation run at load time, before any lexing starts.
    pub fn validate(&self) -> Result<(), CodeIndexError> {
        if self.profile_id.is_empty() {
            return Err(CodeIndexError::Profile("profile_id must not be empty".into()));
        }
        let starts = self.comment_syntax.block_comment_starts.len();
        let ends = self.comment_syntax.block_comment_ends.len();
        if starts != ends {
            return Err(CodeIndexError::Profile(format!(
                "block_comment_starts and block_comment_ends must align: {starts} vs {ends}"
            )));
        }
        if self
            .comment_syntax
            .line_comment_starts
            .iter()
            .chain(&self.comment_syntax.block_comment_starts)
            .chain(&self.comment_syntax.block_comment_ends)
            .any(String::is_empty)
        {
            return Err(CodeIndexError::Profile(
                "comment markers must not be empty".into(),
            ));
        }
        if self.identifier_rule.mode == IdentifierMode::Regex
            && self.identifier_rule.pattern.is_none()
        {
            return Err(CodeIndexError::Profile(
                "identifier_rule.mode=regex requires a pattern".into(),
            ));
        }
        Ok(())
    }

    /// The symbol policy with built-in defaults filled in where the profile
    /// carries none.
    pub fn symbol_policy_or_default(&self) -> SymbolPolicy {
        self.symbol_policy.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSensitivity {
    #[default]
    Sensitive,
    Insensitive,
}

/// How identifier spellings are folded into symbol keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    pub mode: NormalizationMode,
    /// When a folding mode is active, emit the first-seen spelling instead
    /// of the folded key.
    pub preserve_original_spelling: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            mode: NormalizationMode::None,
            preserve_original_spelling: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    #[default]
    None,
    Nfkc,
    LowercaseAscii,
}

/// Shape of an identifier. Only `regex` mode is supported by the engine;
/// `unicode_identifier` parses but is rejected at lexer construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierRule {
    pub mode: IdentifierMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMode {
    Regex,
    UnicodeIdentifier,
}

/// Stop words excluded from the symbol index (typically language keywords).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopWords {
    #[serde(default)]
    pub mode: StopWordsMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl StopWords {
    /// The effective word list. `uri` and `none` modes yield an empty set.
    pub fn effective_words(&self) -> &[String] {
        match self.mode {
            StopWordsMode::Inline => self.words.as_deref().unwrap_or(&[]),
            StopWordsMode::Uri | StopWordsMode::None => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopWordsMode {
    Inline,
    Uri,
    #[default]
    None,
}

/// Comment markers. Block starts and ends are aligned 1-to-1 by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentSyntax {
    #[serde(default)]
    pub line_comment_starts: Vec<String>,
    #[serde(default)]
    pub block_comment_starts: Vec<String>,
    #[serde(default)]
    pub block_comment_ends: Vec<String>,
}

/// String and character literal syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiteralSyntax {
    pub exclude_literals: bool,
    pub string_delims: Vec<char>,
    pub char_delims: Vec<char>,
    pub escape_char: char,
    pub allow_multiline_strings: bool,
}

impl Default for LiteralSyntax {
    fn default() -> Self {
        Self {
            exclude_literals: true,
            string_delims: vec!['"'],
            char_delims: vec!['\''],
            escape_char: '\\',
            allow_multiline_strings: false,
        }
    }
}

/// Which identifiers are admitted into the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolPolicy {
    pub mode: SymbolMode,
    pub exclude_single_letter_identifiers: bool,
    pub include_qualified_identifiers: QualifiedPolicy,
    pub include_include_headers: bool,
}

impl Default for SymbolPolicy {
    fn default() -> Self {
        Self {
            mode: SymbolMode::All,
            exclude_single_letter_identifiers: false,
            include_qualified_identifiers: QualifiedPolicy::None,
            include_include_headers: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolMode {
    #[default]
    All,
    Declared,
}

impl std::fmt::Display for SymbolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Declared => write!(f, "declared"),
        }
    }
}

impl std::str::FromStr for SymbolMode {
    type Err = CodeIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "declared" => Ok(Self::Declared),
            _ => Err(CodeIndexError::Config(format!("unknown symbol mode: {s}"))),
        }
    }
}

/// Which qualified-identifier punctuation admits both sides of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifiedPolicy {
    #[default]
    None,
    Dot,
    Scope,
    DotAndScope,
}

impl QualifiedPolicy {
    pub fn admits_dot(self) -> bool {
        matches!(self, Self::Dot | Self::DotAndScope)
    }

    pub fn admits_scope(self) -> bool {
        matches!(self, Self::Scope | Self::DotAndScope)
    }
}

impl std::fmt::Display for QualifiedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Dot => write!(f, "dot"),
            Self::Scope => write!(f, "scope"),
            Self::DotAndScope => write!(f, "dot_and_scope"),
        }
    }
}

impl std::str::FromStr for QualifiedPolicy {
    type Err = CodeIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "dot" => Ok(Self::Dot),
            "scope" => Ok(Self::Scope),
            "dot_and_scope" => Ok(Self::DotAndScope),
            _ => Err(CodeIndexError::Config(format!(
                "unknown qualified-identifier policy: {s}"
            ))),
        }
    }
}
