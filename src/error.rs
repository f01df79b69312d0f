// src/error.rs

use thiserror::Error;

/// Error types for visual operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualError {
    #[error("Malformed settings payload: {0}")]
    MalformedSettings(String),
    #[error("Column index {index} out of range ({len} ranking columns).")]
    ColumnIndexOutOfRange { index: usize, len: usize },
    #[error("Column at index {0} is structural and cannot be moved.")]
    StructuralColumn(usize),
}
