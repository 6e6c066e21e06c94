//! Error types for the editor

use odt_document::DocumentError;
use thiserror::Error;

/// Why a single operation could not be initialized or executed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Position {position} is outside the document (length {document_length})")]
    Range {
        position: usize,
        document_length: usize,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Document error: {0}")]
    Document(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("{0} operation was already applied")]
    AlreadyApplied(&'static str),

    #[error("{optype} requires {what}, which is not present")]
    MissingPrerequisite { optype: &'static str, what: String },

    #[error("{0} operation has no timestamp")]
    NotStamped(&'static str),
}

impl From<DocumentError> for OpError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::PositionOutOfRange { position, length } => OpError::Range {
                position,
                document_length: length,
            },
            other => OpError::Document(other.to_string()),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Operation error: {0}")]
    Operation(#[from] OpError),

    #[error("Operation {index} ({optype}) of batch failed: {source}")]
    Batch {
        index: usize,
        optype: &'static str,
        source: OpError,
    },

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    /// The operation-level cause, if any
    pub fn op_error(&self) -> Option<&OpError> {
        match self {
            EditorError::Operation(err) | EditorError::Batch { source: err, .. } => Some(err),
            _ => None,
        }
    }
}
