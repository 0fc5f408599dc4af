//! Error types for the RigView harness.

use rigview_env::EnvError;
use thiserror::Error;

/// Errors surfaced by the harness and CLI.
#[derive(Debug, Error)]
pub enum SimError {
    /// Environment construction or query failed
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Output encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Command-line arguments do not form a valid query
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
