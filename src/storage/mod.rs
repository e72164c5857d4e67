//! Storage backends
//!
//! The engine talks to any store through the `GraphBackend` trait.
//! `SqliteBackend` is the bundled implementation.

mod sqlite;
mod traits;

pub use sqlite::SqliteBackend;
pub use traits::{GraphBackend, OpenStore, Row, StatementResult, StorageError, StorageResult};
