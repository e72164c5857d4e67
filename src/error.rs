//! Error taxonomy at the service boundary

use crate::annotation::{PredicateError, ProvenanceError};
use crate::storage::StorageError;
use thiserror::Error;

/// Errors returned by annotation operations
#[derive(Debug, Error)]
pub enum AnnotationsError {
    /// Malformed or incomplete input; nothing was mutated
    #[error("Validation error: {0}")]
    Validation(String),

    /// Predicate name not in the allow-list; nothing was mutated
    #[error("Unsupported predicate: {0}")]
    UnsupportedPredicate(String),

    /// Failure reported by the graph backend, passed through unmodified
    #[error(transparent)]
    Backend(#[from] StorageError),

    /// More than one content root matched a single identifier
    #[error("Ambiguous result: {0}")]
    AmbiguousResult(String),
}

impl From<PredicateError> for AnnotationsError {
    fn from(err: PredicateError) -> Self {
        match err {
            PredicateError::Unsupported(name) => AnnotationsError::UnsupportedPredicate(name),
        }
    }
}

impl From<ProvenanceError> for AnnotationsError {
    fn from(err: ProvenanceError) -> Self {
        AnnotationsError::Validation(err.to_string())
    }
}

/// Result type for annotation operations
pub type AnnotationsResult<T> = Result<T, AnnotationsError>;
