//! Input collection: explicit paths, list files, and root-directory walks.
//!
//! `file_id` is the root-relative `/`-separated path when a root is given,
//! else the basename. Discovery filters (globs, size cap) apply to walked
//! files only; paths the user named explicitly are always taken.

use ignore::WalkBuilder;
use regex::Regex;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use codeindex_core::CodeIndexError;
use codeindex_engine::{glob_to_regex, SourceFile};

/// Where inputs come from and how discovery is constrained.
#[derive(Debug, Clone, Default)]
pub struct InputSpec {
    pub explicit: Vec<PathBuf>,
    pub inputs_file: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub recursive: bool,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub follow_symlinks: bool,
    pub max_file_size_bytes: Option<u64>,
}

/// Collect the sorted, deduplicated input set.
pub fn collect_inputs(spec: &InputSpec) -> Result<Vec<SourceFile>, CodeIndexError> {
    let include = compile_globs(&spec.include_globs)?;
    let exclude = compile_globs(&spec.exclude_globs)?;

    let mut inputs = Vec::new();

    for path in &spec.explicit {
        inputs.push(source_for(path, spec.root.as_deref()));
    }

    if let Some(list_path) = &spec.inputs_file {
        let file = std::fs::File::open(list_path).map_err(|e| {
            CodeIndexError::Config(format!("cannot read {}: {e}", list_path.display()))
        })?;
        for line in std::io::BufReader::new(file).lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            inputs.push(source_for(Path::new(trimmed), spec.root.as_deref()));
        }
    }

    if let Some(root) = &spec.root {
        let mut builder = WalkBuilder::new(root);
        builder
            .follow_links(spec.follow_symlinks)
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
        if !spec.recursive {
            builder.max_depth(Some(1));
        }

        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("Walk error: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();

            if let Some(cap) = spec.max_file_size_bytes {
                match std::fs::metadata(path) {
                    Ok(meta) if meta.len() > cap => {
                        tracing::debug!("Skipping {} ({} bytes > cap)", path.display(), meta.len());
                        continue;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!("Cannot stat {}: {err}", path.display());
                        continue;
                    }
                }
            }

            let source = source_for(path, Some(root));
            if !include.is_empty() && !include.iter().any(|re| re.is_match(&source.file_id)) {
                continue;
            }
            if exclude.iter().any(|re| re.is_match(&source.file_id)) {
                continue;
            }
            inputs.push(source);
        }
    }

    inputs.sort_by(|a, b| a.file_id.cmp(&b.file_id).then_with(|| a.path.cmp(&b.path)));
    inputs.dedup();
    Ok(inputs)
}

fn compile_globs(globs: &[String]) -> Result<Vec<Regex>, CodeIndexError> {
    globs.iter().map(|g| glob_to_regex(g)).collect()
}

fn source_for(path: &Path, root: Option<&Path>) -> SourceFile {
    SourceFile {
        path: path.to_path_buf(),
        file_id: file_id_for(path, root),
    }
}

fn file_id_for(path: &Path, root: Option<&Path>) -> String {
    if let Some(root) = root {
        if let Ok(rel) = path.strip_prefix(root) {
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if !parts.is_empty() {
                return parts.join("/");
            }
        }
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
