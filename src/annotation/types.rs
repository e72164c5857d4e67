//! Annotation data model
//!
//! Field names serialize in camelCase, matching the JSON documents the
//! surrounding ingestion layers exchange.

use serde::{Deserialize, Serialize};

/// A reference to a concept node
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thing {
    /// Concept identifier; a URI whose trailing segment is the canonical id
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pref_label: Option<String>,
    /// Ontology type URIs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Predicate name; empty means the default predicate
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub predicate: String,
}

impl Thing {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = predicate.into();
        self
    }
}

/// A (scoring system, value) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub scoring_system: String,
    pub value: f64,
}

impl Score {
    pub fn new(scoring_system: impl Into<String>, value: f64) -> Self {
        Self {
            scoring_system: scoring_system.into(),
            value,
        }
    }
}

/// One attribution record for an annotation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default)]
    pub scores: Vec<Score>,
    /// Identifier of the asserting agent, usually a URI
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agent_role: String,
    /// RFC3339 timestamp
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub at_time: String,
}

impl Provenance {
    pub fn new(agent_role: impl Into<String>, at_time: impl Into<String>) -> Self {
        Self {
            scores: Vec::new(),
            agent_role: agent_role.into(),
            at_time: at_time.into(),
        }
    }

    pub fn with_score(mut self, scoring_system: impl Into<String>, value: f64) -> Self {
        self.scores.push(Score::new(scoring_system, value));
        self
    }

    /// Value recorded under a scoring system, if any
    pub fn score(&self, scoring_system: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.scoring_system == scoring_system)
            .map(|s| s.value)
    }
}

/// A relationship from one content item to one concept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub thing: Thing,
    #[serde(default)]
    pub provenances: Vec<Provenance>,
}

impl Annotation {
    pub fn new(thing: Thing) -> Self {
        Self {
            thing,
            provenances: Vec::new(),
        }
    }

    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenances.push(provenance);
        self
    }

    /// The provenance whose values are persisted
    pub fn primary_provenance(&self) -> Option<&Provenance> {
        self.provenances.first()
    }
}

/// All annotations of one content item under one lifecycle
pub type Annotations = Vec<Annotation>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_annotation_document() {
        let doc = json!([{
            "thing": {
                "id": "http://api.ft.com/things/2cca9e2a-2248-3e48-abc1-93d718b91bbe",
                "prefLabel": "China Politics & Policy",
                "types": ["http://www.ft.com/ontology/Topic"],
                "predicate": "majorMentions"
            },
            "provenances": [{
                "scores": [
                    {"scoringSystem": "http://api.ft.com/scoringsystem/FT-RELEVANCE-SYSTEM", "value": 0.9},
                    {"scoringSystem": "http://api.ft.com/scoringsystem/FT-CONFIDENCE-SYSTEM", "value": 0.8}
                ],
                "agentRole": "http://api.ft.com/things/0edd3c31-1fd0-4ef6-9230-8d545be3880a",
                "atTime": "2016-01-01T19:43:47.314Z"
            }]
        }]);

        let annotations: Annotations = serde_json::from_value(doc).unwrap();
        assert_eq!(annotations.len(), 1);
        let annotation = &annotations[0];
        assert_eq!(annotation.thing.predicate, "majorMentions");
        assert_eq!(annotation.thing.types.len(), 1);
        let provenance = annotation.primary_provenance().unwrap();
        assert_eq!(
            provenance.score("http://api.ft.com/scoringsystem/FT-CONFIDENCE-SYSTEM"),
            Some(0.8)
        );
    }

    #[test]
    fn test_minimal_thing_serialization() {
        let annotation = Annotation::new(Thing::new("concept-A"));
        let value = serde_json::to_value(&annotation).unwrap();
        assert_eq!(value, json!({"thing": {"id": "concept-A"}, "provenances": []}));
    }

    #[test]
    fn test_missing_provenances_default_empty() {
        let annotation: Annotation = serde_json::from_value(json!({"thing": {"id": "c"}})).unwrap();
        assert!(annotation.primary_provenance().is_none());
    }
}
