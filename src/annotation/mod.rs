//! Annotation model and the input-side translation layers

pub mod identity;
mod predicate;
mod provenance;
mod types;

pub use predicate::{PredicateError, PredicateMapper};
pub use provenance::{ExtractedProvenance, ProvenanceError, ProvenanceExtractor, ScoringSystem};
pub use types::{Annotation, Annotations, Provenance, Score, Thing};
