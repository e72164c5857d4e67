//! annotations-rw: lifecycle-scoped annotation persistence
//!
//! Stores annotations (typed relationships from a content item to a concept,
//! with provenance) as edges in a property graph, and reads them back.
//!
//! # Core Concepts
//!
//! - **Lifecycle**: which ingestion pipeline produced an edge. Writes and
//!   deletes only ever touch the edges of their own lifecycle.
//! - **Platform version**: schema/source generation stored with each edge.
//! - **Statements**: every operation is built as an abstract statement batch
//!   and handed to a `GraphBackend`, which runs it as one transaction.
//!
//! # Example
//!
//! ```
//! use annotations_rw::{Annotation, AnnotationsService, OpenStore, SqliteBackend, Thing};
//! use std::sync::Arc;
//!
//! let backend = SqliteBackend::open_in_memory().unwrap();
//! let service = AnnotationsService::with_backend(Arc::new(backend));
//!
//! let annotations = vec![Annotation::new(Thing::new("concept-A").with_predicate("about"))];
//! service.write("C1", "annotations-v2", "v2", &annotations).unwrap();
//!
//! let stored = service.read("C1", "annotations-v2").unwrap().unwrap();
//! assert_eq!(stored[0].thing.predicate, "about");
//! ```

pub mod annotation;
pub mod config;
mod error;
pub mod graph;
pub mod query;
mod service;
pub mod storage;

pub use annotation::{
    Annotation, Annotations, PredicateError, PredicateMapper, Provenance, ProvenanceError,
    ProvenanceExtractor, Score, Thing,
};
pub use config::{AnnotationsConfig, ConfigError};
pub use error::{AnnotationsError, AnnotationsResult};
pub use graph::{EdgeProperties, Properties, PropertyValue};
pub use query::{QueryBuilder, Statement, StatementKind};
pub use service::AnnotationsService;
pub use storage::{GraphBackend, OpenStore, SqliteBackend, StatementResult, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
