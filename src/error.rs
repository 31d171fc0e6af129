//! Unified error type for the flowtag pipeline.
//!
//! Every fallible stage (protocol registry, tag lookup, flow log aggregation,
//! report writing) returns `FlowTagError`. Malformed records are not errors;
//! only unreadable input or unwritable output ends up here.

use std::path::PathBuf;

/// Pipeline-level error.
#[derive(Debug, thiserror::Error)]
pub enum FlowTagError {
    /// A file could not be opened, read or written.
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on a stream with no associated path.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader could not decode the input.
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// Report serialization failed.
    #[error("{0}")]
    Serialize(#[from] serde_json::Error),
}

impl FlowTagError {
    /// Returns the error kind as a string matching the variant name.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowTagError::File { .. } => "File",
            FlowTagError::Io(_) => "Io",
            FlowTagError::Csv(_) => "Csv",
            FlowTagError::Serialize(_) => "Serialize",
        }
    }

    /// Attach a path to an I/O error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlowTagError::File {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = FlowTagError> = std::result::Result<T, E>;
