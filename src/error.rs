//! Error types for the GLM parser.
//!
//! This module provides a unified error type [`GlmError`] that covers
//! all error conditions that can occur while parsing GLM text, loading and
//! storing trees, and running the feeder transformations.

use thiserror::Error;

/// Result type alias using [`GlmError`].
pub type Result<T> = std::result::Result<T, GlmError>;

/// Unified error type for all GLM operations.
#[derive(Error, Debug)]
pub enum GlmError {
    // ============ Parsing Errors ============
    /// A closing brace with no open block to close
    #[error("Unmatched '}}' at line {line}, column {column} (token {token_index}, byte {offset})")]
    StructuralError {
        line: usize,
        column: usize,
        offset: usize,
        token_index: usize,
    },

    // ============ Tree Document Errors ============
    /// Malformed JSON tree document
    #[error("Invalid tree document: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    /// Node id not present in the tree
    #[error("Node {id} not found in tree")]
    NodeNotFound { id: usize },

    /// Two nodes competing for the same id
    #[error("Duplicate node id {id}")]
    DuplicateId { id: usize },

    /// Node id above the largest id a tree hands out
    #[error("Node id {id} is out of range")]
    IdOutOfRange { id: usize },

    // ============ Feeder Transformation Errors ============
    /// Unknown recorder kind
    #[error("Unknown recorder kind '{name}'")]
    UnknownRecorder { name: String },

    /// Invalid simulation time parameter
    #[error("Invalid time adjustment: {message}")]
    InvalidTimeAdjustment { message: String },

    // ============ I/O Errors ============
    /// Error reading a GLM or tree file
    #[error("Failed to read file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a GLM or tree file
    #[error("Failed to write file '{path}': {source}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl GlmError {
    /// Create a structural error for the token at `token_index`.
    pub fn structural(line: usize, column: usize, offset: usize, token_index: usize) -> Self {
        Self::StructuralError {
            line,
            column,
            offset,
            token_index,
        }
    }

    /// Create a time adjustment error
    pub fn time_adjustment(message: impl Into<String>) -> Self {
        Self::InvalidTimeAdjustment {
            message: message.into(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileReadError {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create a file write error
    pub fn file_write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileWriteError {
            path: path.display().to_string(),
            source,
        }
    }
}
