//! Backend-neutral graph statements
//!
//! A statement names an operation and carries named parameters. Adapters
//! translate each kind into their own query dialect; the kinds and the
//! parameter/column names below are the whole contract.

use crate::graph::{Properties, PropertyValue};

/// Named parameters
pub mod param {
    pub const CONTENT_ID: &str = "contentID";
    pub const CONCEPT_ID: &str = "conceptID";
    pub const CONCEPT_IDS: &str = "conceptIDs";
    pub const LIFECYCLE: &str = "lifecycle";
    pub const PLATFORM_VERSION: &str = "platformVersion";
    pub const EDGE_TYPE: &str = "edgeType";
    /// Object parameter holding the edge properties to set
    pub const PROPERTIES: &str = "props";
}

/// Result column names
pub mod column {
    pub const CONTENT_ID: &str = "contentID";
    pub const CONCEPT_ID: &str = "conceptID";
    pub const PREF_LABEL: &str = "prefLabel";
    pub const TYPES: &str = "types";
    pub const EDGE_TYPE: &str = "edgeType";
    pub const COUNT: &str = "count";
}

/// The operations a backend must support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Remove every edge from `contentID` whose lifecycle is `lifecycle`,
    /// whatever its type or target. Returns one `conceptID` row per removed
    /// edge; the mutation count is the number of edges removed.
    DeleteLifecycleEdges,
    /// Merge the `contentID` and `conceptID` nodes and the `edgeType` edge
    /// between them for the lifecycle in `props`, then set `props` on it.
    MergeAnnotation,
    /// Select every edge from `contentID` whose lifecycle is `lifecycle`.
    /// Rows carry `contentID`, `conceptID`, `prefLabel`, `types`,
    /// `edgeType` and the edge properties.
    ReadLifecycleEdges,
    /// Count edges tagged with both `lifecycle` and `platformVersion`.
    /// One row with a `count` column.
    CountEdges,
    /// Delete each node in `conceptIDs` that has no relationship left,
    /// never the `contentID` node. Mutation count is nodes deleted.
    DeleteOrphanConcepts,
}

/// A single statement with its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub params: Properties,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            params: Properties::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&PropertyValue> {
        self.params.get(name)
    }

    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.param(name).and_then(PropertyValue::as_str)
    }
}

/// An ordered set of statements executed as one transaction
pub type Batch = Vec<Statement>;
