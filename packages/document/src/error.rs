//! Error types for the document model

use crate::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Position {position} is outside the document (length {length})")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
}

/// Result type alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;
