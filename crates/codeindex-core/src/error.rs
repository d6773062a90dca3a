/// Unified error type for CodeIndex.
///
/// Only configuration-class errors are fatal. File-level failures (unreadable
/// inputs, undecodable bytes, unrouted files) never surface here; they become
/// entries in `diagnostics[]` and the run completes.
#[derive(Debug, thiserror::Error)]
pub enum CodeIndexError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Profile error: {0}")]
    Profile(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
