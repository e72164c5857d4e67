//! Predicate name to edge type mapping

use crate::config::AnnotationsConfig;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    #[error("Unsupported predicate: {0}")]
    Unsupported(String),
}

/// Resolves predicate names against the configured allow-list
#[derive(Debug, Clone)]
pub struct PredicateMapper {
    edge_types: HashMap<String, String>,
    predicates: HashMap<String, String>,
    default_predicate: String,
}

impl PredicateMapper {
    pub fn from_config(config: &AnnotationsConfig) -> Self {
        let edge_types: HashMap<String, String> = config
            .predicates
            .iter()
            .map(|(name, edge_type)| (name.clone(), edge_type.clone()))
            .collect();
        let predicates = edge_types
            .iter()
            .map(|(name, edge_type)| (edge_type.clone(), name.clone()))
            .collect();

        Self {
            edge_types,
            predicates,
            default_predicate: config.default_predicate.clone(),
        }
    }

    /// Edge type for a predicate name. An empty name resolves to the default
    /// predicate's edge type.
    pub fn resolve(&self, predicate: &str) -> Result<&str, PredicateError> {
        let name = if predicate.is_empty() {
            self.default_predicate.as_str()
        } else {
            predicate
        };

        self.edge_types
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| PredicateError::Unsupported(predicate.to_string()))
    }

    /// Predicate name stored under an edge type
    pub fn predicate_for(&self, edge_type: &str) -> Option<&str> {
        self.predicates.get(edge_type).map(String::as_str)
    }

    pub fn default_edge_type(&self) -> Result<&str, PredicateError> {
        self.resolve("")
    }
}
