//! Graph data shared between the query layer and storage adapters

pub mod edge;
mod node;

pub use edge::EdgeProperties;
pub use node::{Properties, PropertyValue};
