//! Error types for kindload
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::command::CommandError;

/// All error types that can occur while loading images
#[derive(Debug, Error)]
pub enum KindLoadError {
    /// The node image inventory query failed
    #[error("unable to inspect the nodes: {}", with_output(.0))]
    InventoryQueryFailed(#[source] CommandError),

    /// `kind load` failed for a specific tag
    #[error("unable to load image with kind {tag:?}: {source}, {output}")]
    TransferFailed {
        tag: String,
        #[source]
        source: CommandError,
        output: String,
    },

    /// The operation was interrupted before it finished
    #[error("Operation cancelled")]
    Cancelled,

    /// Invalid or incomplete configuration
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn with_output(err: &CommandError) -> String {
    match err.output() {
        "" => err.to_string(),
        output => format!("{}, {}", err, output),
    }
}

impl KindLoadError {
    /// Tag of the image whose transfer failed, if any
    pub fn failed_tag(&self) -> Option<&str> {
        match self {
            KindLoadError::TransferFailed { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

/// Result type alias for kindload operations
pub type Result<T> = std::result::Result<T, KindLoadError>;
