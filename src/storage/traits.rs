//! Storage trait definitions

use crate::graph::Properties;
use crate::query::Statement;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter {name}: expected {expected}")]
    InvalidParameter { name: String, expected: String },

    #[error("Unexpected result: {0}")]
    UnexpectedResult(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// One result row, keyed by column name
pub type Row = Properties;

/// Outcome of a single statement
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementResult {
    /// Rows returned by the statement
    pub rows: Vec<Row>,
    /// Relationships or nodes created, changed or removed
    pub mutations: usize,
}

impl StatementResult {
    pub fn rows(rows: Vec<Row>) -> Self {
        Self { rows, mutations: 0 }
    }

    pub fn mutations(mutations: usize) -> Self {
        Self {
            rows: Vec::new(),
            mutations,
        }
    }
}

/// Trait for graph backends
///
/// Implementations must be thread-safe (Send + Sync) to support
/// concurrent access from multiple threads.
pub trait GraphBackend: Send + Sync {
    /// Execute a batch as a single transaction: either every statement
    /// applies or none does. Returns one result per statement, in order.
    fn execute(&self, batch: &[Statement]) -> StorageResult<Vec<StatementResult>>;

    /// Verify the backend is reachable
    fn check(&self) -> StorageResult<()>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: GraphBackend + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
