//! Persisted annotation edge properties
//!
//! Every annotation edge carries the same fixed property set. The key names
//! below are the durable format shared with every backend adapter.

use super::node::{Properties, PropertyValue};
use serde::{Deserialize, Serialize};

pub const LIFECYCLE: &str = "lifecycle";
pub const PLATFORM_VERSION: &str = "platformVersion";
pub const RELEVANCE_SCORE: &str = "relevanceScore";
pub const CONFIDENCE_SCORE: &str = "confidenceScore";
pub const ANNOTATED_BY: &str = "annotatedBy";
pub const ANNOTATED_DATE: &str = "annotatedDate";
pub const ANNOTATED_DATE_EPOCH: &str = "annotatedDateEpoch";

/// Properties stored on an annotation edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeProperties {
    /// Ingestion pipeline that produced the edge
    pub lifecycle: String,
    /// Schema/source generation
    pub platform_version: String,
    pub relevance_score: f64,
    pub confidence_score: f64,
    /// Annotating agent identifier (may be empty)
    pub annotated_by: String,
    /// RFC3339 text, preserved verbatim
    pub annotated_date: String,
    /// `annotated_date` as epoch seconds (0 when absent)
    pub annotated_date_epoch: i64,
}

impl EdgeProperties {
    /// Flatten into a property map keyed by the persisted names
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert(LIFECYCLE.to_string(), self.lifecycle.clone().into());
        props.insert(PLATFORM_VERSION.to_string(), self.platform_version.clone().into());
        props.insert(RELEVANCE_SCORE.to_string(), self.relevance_score.into());
        props.insert(CONFIDENCE_SCORE.to_string(), self.confidence_score.into());
        props.insert(ANNOTATED_BY.to_string(), self.annotated_by.clone().into());
        props.insert(ANNOTATED_DATE.to_string(), self.annotated_date.clone().into());
        props.insert(ANNOTATED_DATE_EPOCH.to_string(), self.annotated_date_epoch.into());
        props
    }

    /// Rebuild from a property map. Absent keys fall back to empty/zero values.
    pub fn from_properties(props: &Properties) -> Self {
        let text = |key: &str| {
            props
                .get(key)
                .and_then(PropertyValue::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let number = |key: &str| props.get(key).and_then(PropertyValue::as_f64).unwrap_or(0.0);

        Self {
            lifecycle: text(LIFECYCLE),
            platform_version: text(PLATFORM_VERSION),
            relevance_score: number(RELEVANCE_SCORE),
            confidence_score: number(CONFIDENCE_SCORE),
            annotated_by: text(ANNOTATED_BY),
            annotated_date: text(ANNOTATED_DATE),
            annotated_date_epoch: props
                .get(ANNOTATED_DATE_EPOCH)
                .and_then(PropertyValue::as_i64)
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_carry_every_key() {
        let edge = EdgeProperties {
            lifecycle: "annotations-v2".to_string(),
            platform_version: "v2".to_string(),
            relevance_score: 0.9,
            confidence_score: 0.8,
            annotated_by: "agent-X".to_string(),
            annotated_date: "2016-01-01T19:43:47.314Z".to_string(),
            annotated_date_epoch: 1_451_677_427,
        };

        let props = edge.to_properties();
        assert_eq!(props.len(), 7);
        assert_eq!(props.get(RELEVANCE_SCORE), Some(&PropertyValue::Float(0.9)));
        assert_eq!(EdgeProperties::from_properties(&props), edge);
    }

    #[test]
    fn test_missing_keys_default_to_zero() {
        let mut props = Properties::new();
        props.insert(LIFECYCLE.to_string(), "l".into());

        let edge = EdgeProperties::from_properties(&props);
        assert_eq!(edge.lifecycle, "l");
        assert_eq!(edge.confidence_score, 0.0);
        assert_eq!(edge.annotated_date_epoch, 0);
        assert!(edge.annotated_by.is_empty());
    }

    #[test]
    fn test_json_uses_persisted_names() {
        let json = serde_json::to_value(EdgeProperties::default()).unwrap();
        assert!(json.get("annotatedDateEpoch").is_some());
        assert!(json.get("platformVersion").is_some());
    }
}
