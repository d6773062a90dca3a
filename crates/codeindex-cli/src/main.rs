//! codeindex: deterministic, profile-driven symbol indexing over source trees.
//!
//! Exit codes: 0 on success (including runs that only accumulated
//! recoverable diagnostics), 2 on usage and configuration errors.

mod inputs;
mod rows;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use codeindex_core::{LanguageProfile, QualifiedPolicy, SymbolIndex, SymbolMode};
use codeindex_engine::{
    build_project_index, index_files, to_canonical_json, write_canonical_json, CompiledRegistry,
    IndexOptions, ProfileRegistry, ProjectOptions, SourceFile,
};

use crate::inputs::InputSpec;
use crate::rows::RowsFormat;

#[derive(Parser, Debug)]
#[command(
    name = "codeindex",
    about = "Deterministic, profile-driven symbol indexer",
    version
)]
struct Cli {
    /// Language profile JSON (single-profile mode)
    #[arg(long, value_name = "PATH", conflicts_with = "registry")]
    profile: Option<PathBuf>,

    /// Profile registry JSON for mixed-language trees
    #[arg(long, value_name = "PATH")]
    registry: Option<PathBuf>,

    /// Input file (repeatable)
    #[arg(long = "input", value_name = "PATH")]
    input: Vec<PathBuf>,

    /// File listing one input path per line (# comments allowed)
    #[arg(long, value_name = "PATH")]
    inputs_file: Option<PathBuf>,

    /// Root directory: discovery base and file_id prefix
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Recurse into subdirectories of --root
    #[arg(long)]
    recursive: bool,

    /// Only index root-relative paths matching this glob (repeatable)
    #[arg(long = "include-glob", value_name = "GLOB")]
    include_glob: Vec<String>,

    /// Skip root-relative paths matching this glob (repeatable)
    #[arg(long = "exclude-glob", value_name = "GLOB")]
    exclude_glob: Vec<String>,

    /// Follow symbolic links during discovery
    #[arg(long)]
    follow_symlinks: bool,

    /// Skip discovered files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_file_size_bytes: Option<u64>,

    /// Output path for the index document (stdout when omitted)
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Output directory for per-profile artifacts (registry mode)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Index only identifiers admitted by declaration discovery
    #[arg(long, conflicts_with = "all_identifiers")]
    declared_only: bool,

    /// Index every identifier that is not a stop word
    #[arg(long)]
    all_identifiers: bool,

    /// Drop single-letter identifiers unless explicitly declared
    #[arg(long, conflicts_with = "include_single_letter")]
    exclude_single_letter: bool,

    /// Keep single-letter identifiers
    #[arg(long)]
    include_single_letter: bool,

    /// Qualified-identifier policy: none|dot|scope|dot_and_scope
    #[arg(long, value_name = "POLICY")]
    qualified: Option<String>,

    /// Admit identifiers found in #include paths: true|false
    #[arg(long, value_name = "BOOL")]
    include_headers: Option<bool>,

    /// Record byte offsets on occurrences
    #[arg(long)]
    byte_offsets: bool,

    /// Timestamp stamped into generated_at (RFC 3339), for reproducible runs
    #[arg(long, value_name = "TIMESTAMP")]
    generated_at: Option<String>,

    /// Symbol ordering (only "lex" is defined)
    #[arg(long, value_name = "ORDER", default_value = "lex")]
    ordering: String,

    /// Also emit flattened occurrence rows: csv|jsonl
    #[arg(long, value_name = "FORMAT")]
    emit_rows: Option<String>,

    /// Rows output: file in single-profile mode, directory in registry mode
    #[arg(long, value_name = "PATH")]
    emit_rows_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    // stdout is reserved for emitted JSON; all logging goes to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codeindex=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

enum RunMode {
    Single(PathBuf),
    Registry(PathBuf),
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mode = match (&cli.profile, &cli.registry) {
        (Some(path), None) => RunMode::Single(path.clone()),
        (None, Some(path)) => RunMode::Registry(path.clone()),
        (None, None) => bail!("one of --profile or --registry is required"),
        (Some(_), Some(_)) => bail!("--profile and --registry are mutually exclusive"),
    };
    if cli.ordering != "lex" {
        bail!("unsupported --ordering {:?}: only \"lex\" is defined", cli.ordering);
    }
    if let Some(ts) = &cli.generated_at {
        chrono::DateTime::parse_from_rfc3339(ts)
            .map_err(|e| anyhow!("invalid --generated-at {ts:?}: {e}"))?;
    }

    let rows_format = cli
        .emit_rows
        .as_deref()
        .map(RowsFormat::from_str)
        .transpose()?;

    let options = IndexOptions {
        mode: if cli.declared_only {
            Some(SymbolMode::Declared)
        } else if cli.all_identifiers {
            Some(SymbolMode::All)
        } else {
            None
        },
        exclude_single_letter: if cli.exclude_single_letter {
            Some(true)
        } else if cli.include_single_letter {
            Some(false)
        } else {
            None
        },
        include_qualified: cli
            .qualified
            .as_deref()
            .map(QualifiedPolicy::from_str)
            .transpose()?,
        include_headers: cli.include_headers,
        generated_at: cli.generated_at.clone(),
        byte_offsets: cli.byte_offsets,
    };

    let inputs = inputs::collect_inputs(&InputSpec {
        explicit: cli.input.clone(),
        inputs_file: cli.inputs_file.clone(),
        root: cli.root.clone(),
        recursive: cli.recursive,
        include_globs: cli.include_glob.clone(),
        exclude_globs: cli.exclude_glob.clone(),
        follow_symlinks: cli.follow_symlinks,
        max_file_size_bytes: cli.max_file_size_bytes,
    })?;
    if inputs.is_empty() {
        bail!("no input files (use --input, --inputs-file, or --root)");
    }

    match mode {
        RunMode::Single(path) => run_single_profile(&cli, &path, inputs, &options, rows_format),
        RunMode::Registry(path) => run_registry(&cli, &path, inputs, &options, rows_format),
    }
}

fn run_single_profile(
    cli: &Cli,
    profile_path: &Path,
    inputs: Vec<SourceFile>,
    options: &IndexOptions,
    rows_format: Option<RowsFormat>,
) -> anyhow::Result<()> {
    let profile = LanguageProfile::load(profile_path)?;
    let index = index_files(&profile, &inputs, options)?;

    match &cli.out {
        Some(path) => write_canonical_json(&index, path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", to_canonical_json(&index)?),
    }

    if let Some(format) = rows_format {
        emit_rows_single(&index, format, cli.emit_rows_out.as_deref())?;
    }
    Ok(())
}

fn emit_rows_single(
    index: &SymbolIndex,
    format: RowsFormat,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            rows::write_rows(index, format, &mut file)?;
        }
        None => {
            let stdout = std::io::stdout();
            rows::write_rows(index, format, &mut stdout.lock())?;
        }
    }
    Ok(())
}

fn run_registry(
    cli: &Cli,
    registry_path: &Path,
    inputs: Vec<SourceFile>,
    options: &IndexOptions,
    rows_format: Option<RowsFormat>,
) -> anyhow::Result<()> {
    let registry = ProfileRegistry::load(registry_path)?;
    let registry_id = registry.registry_id.clone();
    let compiled = CompiledRegistry::compile(registry)?;
    let (groups, diagnostics) = compiled.partition(inputs);

    // Relative profile paths resolve against the registry file's directory.
    let registry_dir = registry_path.parent().unwrap_or_else(|| Path::new("."));

    let mut indexes: Vec<(String, SymbolIndex)> = Vec::new();
    for (alias, group) in groups {
        let rel = compiled
            .profile_path(&alias)
            .ok_or_else(|| anyhow!("unknown profile alias: {alias}"))?;
        let profile = LanguageProfile::load(&registry_dir.join(rel))?;
        let index = index_files(&profile, &group, options)?;
        indexes.push((alias, index));
    }

    let mut artifacts = None;
    if let Some(out_dir) = &cli.out_dir {
        let mut map = BTreeMap::new();
        for (alias, index) in &indexes {
            let name = format!("{alias}.symbol_index.json");
            write_canonical_json(index, &out_dir.join(&name))
                .with_context(|| format!("writing {name}"))?;
            map.insert(alias.clone(), name);
        }
        artifacts = Some(map);
    }

    if let Some(format) = rows_format {
        let dir = cli
            .emit_rows_out
            .as_deref()
            .ok_or_else(|| anyhow!("--emit-rows requires --emit-rows-out <dir> in registry mode"))?;
        std::fs::create_dir_all(dir)?;
        for (alias, index) in &indexes {
            let path = dir.join(format!("{alias}.rows.{}", format.extension()));
            let mut file = std::fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            rows::write_rows(index, format, &mut file)?;
        }
    }

    // A ProjectIndex is emitted unless the run only asked for per-profile
    // artifact files.
    if cli.out.is_some() || cli.out_dir.is_none() {
        let project = build_project_index(
            indexes.into_iter().map(|(_, index)| index).collect(),
            diagnostics,
            &ProjectOptions {
                project_root: cli
                    .root
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| ".".to_string()),
                registry_id,
                generated_at: cli.generated_at.clone(),
                artifacts,
            },
        );
        match &cli.out {
            Some(path) => write_canonical_json(&project, path)
                .with_context(|| format!("writing {}", path.display()))?,
            None => print!("{}", to_canonical_json(&project)?),
        }
    }

    Ok(())
}
