//! The module contains the errors the engine can report.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an input violates a field rule (empty name,
//!   non-positive quantity or price, negative replacement).
//! - [`NotFound`] thrown when a customer or a cash movement does not exist.
//! - [`PersistenceCorruption`] reported when the stored document cannot be
//!   read. Loading recovers from it with a fresh document.
//! - [`ExportWrite`] thrown when a delivery sheet cannot be written. A failed
//!   export never resets pending quantities.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`PersistenceCorruption`]: EngineError::PersistenceCorruption
//!  [`ExportWrite`]: EngineError::ExportWrite
use std::path::PathBuf;

use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Corrupted document at {}: {reason}", path.display())]
    PersistenceCorruption { path: PathBuf, reason: String },
    #[error("Cannot write export {}: {source}", path.display())]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by caller input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Validation {
                    field: a,
                    reason: ra,
                },
                Self::Validation {
                    field: b,
                    reason: rb,
                },
            ) => a == b && ra == rb,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (
                Self::PersistenceCorruption { path: a, reason: ra },
                Self::PersistenceCorruption { path: b, reason: rb },
            ) => a == b && ra == rb,
            (Self::ExportWrite { path: a, .. }, Self::ExportWrite { path: b, .. }) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Json(a), Self::Json(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
