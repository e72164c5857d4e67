//! Query construction
//!
//! Operations are expressed as abstract statements with named parameters.
//! Translating them into a concrete graph dialect is the storage adapter's
//! job.

mod builder;
mod statement;

pub use builder::QueryBuilder;
pub use statement::{column, param, Batch, Statement, StatementKind};
