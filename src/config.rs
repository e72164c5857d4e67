//! Engine configuration
//!
//! Predicate and lifecycle mappings are data, loaded once at startup and
//! shared read-only with the service. Any key missing from the YAML source
//! keeps its built-in default.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub const RELEVANCE_SCORING_SYSTEM: &str = "http://api.ft.com/scoringsystem/FT-RELEVANCE-SYSTEM";
pub const CONFIDENCE_SCORING_SYSTEM: &str = "http://api.ft.com/scoringsystem/FT-CONFIDENCE-SYSTEM";

const DEFAULT_PREDICATES: &[(&str, &str)] = &[
    ("mentions", "MENTIONS"),
    ("isClassifiedBy", "IS_CLASSIFIED_BY"),
    ("implicitlyClassifiedBy", "IMPLICITLY_CLASSIFIED_BY"),
    ("about", "ABOUT"),
    ("isPrimarilyClassifiedBy", "IS_PRIMARILY_CLASSIFIED_BY"),
    ("majorMentions", "MAJOR_MENTIONS"),
    ("hasAuthor", "HAS_AUTHOR"),
    ("hasContributor", "HAS_CONTRIBUTOR"),
    ("hasDisplayTag", "HAS_DISPLAY_TAG"),
    ("hasBrand", "HAS_BRAND"),
];

const DEFAULT_LIFECYCLES: &[(&str, &str)] = &[
    ("annotations-v1", "v1"),
    ("annotations-v2", "v2"),
    ("annotations-pac", "pac"),
    ("annotations-next-video", "next-video"),
];

/// Immutable engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Allow-list: predicate name -> edge type
    pub predicates: BTreeMap<String, String>,
    /// Predicate used when an annotation names none
    pub default_predicate: String,
    /// Lifecycle -> platform version
    pub lifecycles: BTreeMap<String, String>,
    /// Recognized relevance scoring systems; the first is canonical
    pub relevance_scoring_systems: Vec<String>,
    /// Recognized confidence scoring systems; the first is canonical
    pub confidence_scoring_systems: Vec<String>,
    /// Prefix used to render UUID identifiers as URIs on read
    pub thing_uri_prefix: String,
    /// Remove concept nodes left without relationships after a delete
    pub cleanup_orphan_concepts: bool,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        let pairs = |entries: &[(&str, &str)]| {
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>()
        };

        Self {
            predicates: pairs(DEFAULT_PREDICATES),
            default_predicate: "mentions".to_string(),
            lifecycles: pairs(DEFAULT_LIFECYCLES),
            relevance_scoring_systems: vec![
                RELEVANCE_SCORING_SYSTEM.to_string(),
                "relevance".to_string(),
            ],
            confidence_scoring_systems: vec![
                CONFIDENCE_SCORING_SYSTEM.to_string(),
                "confidence".to_string(),
            ],
            thing_uri_prefix: "http://api.ft.com/things/".to_string(),
            cleanup_orphan_concepts: true,
        }
    }
}

impl AnnotationsConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Platform version configured for a lifecycle
    pub fn platform_version_for(&self, lifecycle: &str) -> Option<&str> {
        self.lifecycles.get(lifecycle).map(String::as_str)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut edge_types = HashSet::new();
        for (name, edge_type) in &self.predicates {
            if !is_token(name) {
                return Err(ConfigError::Invalid(format!("bad predicate name: {:?}", name)));
            }
            if !is_token(edge_type) {
                return Err(ConfigError::Invalid(format!(
                    "bad edge type for predicate {}: {:?}",
                    name, edge_type
                )));
            }
            if !edge_types.insert(edge_type.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "edge type {} is mapped by more than one predicate",
                    edge_type
                )));
            }
        }

        if !self.predicates.contains_key(&self.default_predicate) {
            return Err(ConfigError::Invalid(format!(
                "default predicate {} is not in the predicate list",
                self.default_predicate
            )));
        }

        if self.lifecycles.keys().any(|l| l.is_empty()) {
            return Err(ConfigError::Invalid("empty lifecycle name".to_string()));
        }

        if self.relevance_scoring_systems.is_empty() || self.confidence_scoring_systems.is_empty() {
            return Err(ConfigError::Invalid(
                "relevance and confidence scoring systems must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnnotationsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.predicates.get("hasBrand").map(String::as_str), Some("HAS_BRAND"));
        assert_eq!(config.platform_version_for("annotations-v2"), Some("v2"));
        assert_eq!(config.platform_version_for("annotations-unknown"), None);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AnnotationsConfig::from_yaml_str(
            r#"
lifecycles:
  annotations-manual: manual
cleanup_orphan_concepts: false
"#,
        )
        .unwrap();

        assert_eq!(config.platform_version_for("annotations-manual"), Some("manual"));
        assert_eq!(config.platform_version_for("annotations-v2"), None);
        assert!(!config.cleanup_orphan_concepts);
        assert_eq!(config.default_predicate, "mentions");
        assert_eq!(config.predicates.len(), 10);
    }

    #[test]
    fn test_default_predicate_must_be_listed() {
        let err = AnnotationsConfig::from_yaml_str(
            r#"
predicates:
  about: ABOUT
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_duplicate_edge_types_rejected() {
        let err = AnnotationsConfig::from_yaml_str(
            r#"
predicates:
  mentions: MENTIONS
  alsoMentions: MENTIONS
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_whitespace_in_edge_type_rejected() {
        let err = AnnotationsConfig::from_yaml_str(
            r#"
predicates:
  mentions: "MEN TIONS"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = AnnotationsConfig::from_yaml_str("predicates: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotations.yaml");
        std::fs::write(&path, "thing_uri_prefix: \"http://example.org/things/\"\n").unwrap();

        let config = AnnotationsConfig::load(&path).unwrap();
        assert_eq!(config.thing_uri_prefix, "http://example.org/things/");
    }
}
