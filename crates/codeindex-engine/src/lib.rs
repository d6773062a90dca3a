//! codeindex-engine: the CodeIndex core pipeline.
//!
//! Profile-driven lexing, purely lexical declaration discovery, multi-file
//! aggregation into canonical `SymbolIndex` documents, and glob-based
//! routing of mixed-language trees through a profile registry.

pub mod discovery;
pub mod emit;
pub mod indexer;
pub mod lexer;
pub mod registry;

pub use discovery::discover_declared;
pub use emit::{to_canonical_json, write_canonical_json};
pub use indexer::{
    build_project_index, default_timestamp, index_files, IndexOptions, ProjectOptions,
    ResolvedPolicy, SourceFile,
};
pub use lexer::{CompiledProfile, Lexer};
pub use registry::{glob_to_regex, CompiledRegistry, ProfileRegistry, RegistryRule, RuleMatch};
