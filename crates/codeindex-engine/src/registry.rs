//! Profile registry: glob-rule routing of file paths to per-language
//! profiles for mixed-language repositories.
//!
//! Rules are order-sensitive and the first matching rule wins. Globs are
//! anchored at both ends of the `/`-normalised path: `*` matches a run of
//! non-`/` characters, `?` exactly one, and `**` any run including `/`
//! (with `**/` also matching zero leading directories).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use codeindex_core::{jsonc, CodeIndexError, Diagnostic, Severity};

use crate::indexer::SourceFile;

/// The registry document: profile aliases and ordered routing rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRegistry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    /// alias -> profile JSON path (relative paths resolve against the
    /// registry file's directory).
    pub profiles: BTreeMap<String, String>,
    pub rules: Vec<RegistryRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRule {
    #[serde(rename = "match")]
    pub matcher: RuleMatch,
    pub profile: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleMatch {
    pub glob: String,
}

impl ProfileRegistry {
    /// Load and validate a registry file (comment/trailing-comma tolerant).
    pub fn load(path: &Path) -> Result<Self, CodeIndexError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CodeIndexError::Registry(format!("cannot read {}: {e}", path.display()))
        })?;
        let registry: ProfileRegistry = jsonc::from_str(&text).map_err(|e| {
            CodeIndexError::Registry(format!("malformed registry {}: {e}", path.display()))
        })?;
        registry.validate()?;
        Ok(registry)
    }

    /// Every rule must point at a known alias.
    pub fn validate(&self) -> Result<(), CodeIndexError> {
        for rule in &self.rules {
            if !self.profiles.contains_key(&rule.profile) {
                return Err(CodeIndexError::Registry(format!(
                    "rule {:?} refers to unknown profile alias: {}",
                    rule.matcher.glob, rule.profile
                )));
            }
        }
        Ok(())
    }
}

/// A registry with every rule glob compiled to an anchored regex.
pub struct CompiledRegistry {
    registry: ProfileRegistry,
    rules: Vec<(Regex, String)>,
}

impl CompiledRegistry {
    pub fn compile(registry: ProfileRegistry) -> Result<Self, CodeIndexError> {
        let rules = registry
            .rules
            .iter()
            .map(|rule| Ok((glob_to_regex(&rule.matcher.glob)?, rule.profile.clone())))
            .collect::<Result<Vec<_>, CodeIndexError>>()?;
        Ok(Self { registry, rules })
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// First matching rule's alias, or `None` (a recoverable policy miss).
    pub fn resolve(&self, file_id: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(re, _)| re.is_match(file_id))
            .map(|(_, alias)| alias.as_str())
    }

    pub fn profile_path(&self, alias: &str) -> Option<&str> {
        self.registry.profiles.get(alias).map(String::as_str)
    }

    /// Partition inputs by resolved alias. Files no rule matches are
    /// skipped with a `registry.no_rule` diagnostic.
    pub fn partition(
        &self,
        inputs: Vec<SourceFile>,
    ) -> (BTreeMap<String, Vec<SourceFile>>, Vec<Diagnostic>) {
        let mut groups: BTreeMap<String, Vec<SourceFile>> = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for input in inputs {
            match self.resolve(&input.file_id) {
                Some(alias) => {
                    tracing::debug!("{} -> {}", input.file_id, alias);
                    groups.entry(alias.to_string()).or_default().push(input);
                }
                None => {
                    tracing::warn!("No registry rule matches {}", input.file_id);
                    diagnostics.push(Diagnostic::file_level(
                        Severity::Warning,
                        &input.file_id,
                        "registry.no_rule",
                        "no registry rule matches this file".to_string(),
                    ));
                }
            }
        }

        (groups, diagnostics)
    }
}

/// Translate one glob pattern into an anchored regex.
pub fn glob_to_regex(glob: &str) -> Result<Regex, CodeIndexError> {
    let chars: Vec<char> = glob.chars().collect();
    let mut pattern = String::from(r"\A");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_boundary = i == 0 || chars[i - 1] == '/';
                if at_boundary && chars.get(i + 2) == Some(&'/') {
                    // `**/` also matches zero directories
                    pattern.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    pattern.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                pattern.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                pattern.push_str("[^/]");
                i += 1;
            }
            c => {
                pattern.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    pattern.push_str(r"\z");
    Regex::new(&pattern)
        .map_err(|e| CodeIndexError::Registry(format!("invalid glob {glob:?}: {e}")))
}
