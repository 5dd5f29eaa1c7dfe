//! Error types for tree construction and persistence.
//!
//! Tree construction is a deterministic offline computation: every error here
//! aborts the run. There is no retry model and no partial result.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::tree::NodeId;

/// Errors raised while constructing input matrices.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    /// Number of package names does not match the number of matrix columns.
    #[error("expected {expected} package names, got {actual}")]
    PackageNameCount { expected: usize, actual: usize },

    /// A row has a different length from the first row.
    #[error("row {row} has {actual} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Dependency matrix is not square.
    #[error("dependency matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Dependency matrix entry is neither 0 nor 1.
    #[error("dependency entry [{row}, {col}] must be 0 or 1, got {value}")]
    InvalidDependencyEntry { row: usize, col: usize, value: u8 },
}

/// Errors raised while building or refining an [`ImportTree`](crate::tree::ImportTree).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    /// Calls matrix, dependency matrix and weight vector disagree on package count.
    #[error("{what} has {actual} packages, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Split options failed validation.
    #[error("invalid split options: {0}")]
    Config(#[from] ConfigError),

    /// Applying a split did not reduce cost by the predicted benefit.
    #[error(
        "split on package {package} at node {node} predicted benefit {predicted}, realized {realized}"
    )]
    InconsistentBenefit {
        node: NodeId,
        package: usize,
        predicted: f64,
        realized: f64,
    },
}

/// Errors raised while saving or loading tree documents.
#[derive(Debug, Error)]
pub enum PersistError {
    /// I/O error on the given path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input document decoded but does not describe valid matrices.
    #[error("invalid input document: {0}")]
    Data(#[from] DataError),
}

impl PersistError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
