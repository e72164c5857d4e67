//! Score and attribution extraction from provenance records

use super::identity;
use super::types::{Provenance, Score};
use crate::config::AnnotationsConfig;
use chrono::DateTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvenanceError {
    #[error("Invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// Values persisted from a primary provenance
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedProvenance {
    pub relevance: f64,
    pub confidence: f64,
    pub agent_id: String,
    /// Timestamp text as supplied
    pub annotated_date: String,
    pub annotated_date_epoch: i64,
}

/// Which recognized scoring system an identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringSystem {
    Relevance,
    Confidence,
}

/// Pulls scores, agent and time out of provenance records
#[derive(Debug, Clone)]
pub struct ProvenanceExtractor {
    relevance_systems: Vec<String>,
    confidence_systems: Vec<String>,
    thing_uri_prefix: String,
}

impl ProvenanceExtractor {
    pub fn from_config(config: &AnnotationsConfig) -> Self {
        Self {
            relevance_systems: config.relevance_scoring_systems.clone(),
            confidence_systems: config.confidence_scoring_systems.clone(),
            thing_uri_prefix: config.thing_uri_prefix.clone(),
        }
    }

    pub fn classify(&self, scoring_system: &str) -> Option<ScoringSystem> {
        if self.relevance_systems.iter().any(|s| s == scoring_system) {
            Some(ScoringSystem::Relevance)
        } else if self.confidence_systems.iter().any(|s| s == scoring_system) {
            Some(ScoringSystem::Confidence)
        } else {
            None
        }
    }

    /// Extract the persisted values. Unknown scoring systems are dropped and
    /// missing scores default to zero. An empty timestamp is epoch zero.
    pub fn extract(&self, provenance: &Provenance) -> Result<ExtractedProvenance, ProvenanceError> {
        let mut extracted = ExtractedProvenance {
            agent_id: identity::agent_id(&provenance.agent_role),
            annotated_date: provenance.at_time.clone(),
            annotated_date_epoch: parse_epoch(&provenance.at_time)?,
            ..Default::default()
        };

        for score in &provenance.scores {
            match self.classify(&score.scoring_system) {
                Some(ScoringSystem::Relevance) => extracted.relevance = score.value,
                Some(ScoringSystem::Confidence) => extracted.confidence = score.value,
                None => tracing::warn!(
                    scoring_system = %score.scoring_system,
                    "ignoring score from unrecognized scoring system"
                ),
            }
        }

        Ok(extracted)
    }

    /// Rebuild a provenance record from persisted edge values
    pub fn rebuild(
        &self,
        relevance: f64,
        confidence: f64,
        annotated_by: &str,
        annotated_date: &str,
    ) -> Provenance {
        Provenance {
            scores: vec![
                Score::new(canonical(&self.relevance_systems, "relevance"), relevance),
                Score::new(canonical(&self.confidence_systems, "confidence"), confidence),
            ],
            agent_role: identity::to_uri(&self.thing_uri_prefix, annotated_by),
            at_time: annotated_date.to_string(),
        }
    }
}

fn canonical(systems: &[String], fallback: &str) -> String {
    systems.first().map_or_else(|| fallback.to_string(), Clone::clone)
}

/// Strict RFC3339 to epoch seconds
fn parse_epoch(at_time: &str) -> Result<i64, ProvenanceError> {
    if at_time.is_empty() {
        return Ok(0);
    }
    DateTime::parse_from_rfc3339(at_time)
        .map(|dt| dt.timestamp())
        .map_err(|e| ProvenanceError::InvalidTimestamp {
            value: at_time.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIDENCE_SCORING_SYSTEM, RELEVANCE_SCORING_SYSTEM};

    fn extractor() -> ProvenanceExtractor {
        ProvenanceExtractor::from_config(&AnnotationsConfig::default())
    }

    #[test]
    fn test_extract_full_provenance() {
        let provenance = Provenance::new(
            "http://api.ft.com/things/0edd3c31-1fd0-4ef6-9230-8d545be3880a",
            "2016-01-01T19:43:47.314Z",
        )
        .with_score(RELEVANCE_SCORING_SYSTEM, 0.9)
        .with_score(CONFIDENCE_SCORING_SYSTEM, 0.8);

        let extracted = extractor().extract(&provenance).unwrap();
        assert_eq!(extracted.relevance, 0.9);
        assert_eq!(extracted.confidence, 0.8);
        assert_eq!(extracted.agent_id, "0edd3c31-1fd0-4ef6-9230-8d545be3880a");
        assert_eq!(extracted.annotated_date, "2016-01-01T19:43:47.314Z");
        assert_eq!(extracted.annotated_date_epoch, 1_451_677_427);
    }

    #[test]
    fn test_short_scoring_system_names() {
        let provenance = Provenance::default()
            .with_score("relevance", 0.4)
            .with_score("confidence", 0.6);

        let extracted = extractor().extract(&provenance).unwrap();
        assert_eq!(extracted.relevance, 0.4);
        assert_eq!(extracted.confidence, 0.6);
    }

    #[test]
    fn test_missing_and_unknown_scores() {
        let provenance = Provenance::default()
            .with_score("relevance", 0.7)
            .with_score("http://example.org/scoring/popularity", 12.0);

        let extracted = extractor().extract(&provenance).unwrap();
        assert_eq!(extracted.relevance, 0.7);
        assert_eq!(extracted.confidence, 0.0);
    }

    #[test]
    fn test_empty_timestamp_is_epoch_zero() {
        let extracted = extractor().extract(&Provenance::default()).unwrap();
        assert_eq!(extracted.annotated_date_epoch, 0);
        assert!(extracted.annotated_date.is_empty());
        assert!(extracted.agent_id.is_empty());
    }

    #[test]
    fn test_non_rfc3339_timestamp_rejected() {
        let provenance = Provenance::new("", "2016-01-01 19:43:47");
        let err = extractor().extract(&provenance).unwrap_err();
        assert!(matches!(err, ProvenanceError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_offset_timestamp() {
        let provenance = Provenance::new("", "1970-01-01T01:00:10+01:00");
        let extracted = extractor().extract(&provenance).unwrap();
        assert_eq!(extracted.annotated_date_epoch, 10);
    }

    #[test]
    fn test_rebuild_uses_canonical_systems() {
        let provenance = extractor().rebuild(0.5, 0.0, "agent-X", "2016-01-01T19:43:47.314Z");
        assert_eq!(provenance.score(RELEVANCE_SCORING_SYSTEM), Some(0.5));
        assert_eq!(provenance.score(CONFIDENCE_SCORING_SYSTEM), Some(0.0));
        assert_eq!(provenance.score("relevance"), None);
        assert_eq!(provenance.agent_role, "agent-X");
    }

    #[test]
    fn test_rebuild_echoes_extracted_systems() {
        let extractor = extractor();
        let written = Provenance::new("", "")
            .with_score(RELEVANCE_SCORING_SYSTEM, 0.9)
            .with_score(CONFIDENCE_SCORING_SYSTEM, 0.8);

        let extracted = extractor.extract(&written).unwrap();
        let rebuilt = extractor.rebuild(extracted.relevance, extracted.confidence, "", "");
        assert_eq!(rebuilt, written);
    }
}
