//! Statement batches for each annotation operation
//!
//! Building is pure: nothing here touches a backend. Write resolves every
//! predicate and provenance before emitting anything, so a bad annotation
//! anywhere in the input yields an error and no batch at all.

use super::statement::{param, Batch, Statement, StatementKind};
use crate::annotation::{identity, Annotation, PredicateMapper, ProvenanceExtractor};
use crate::error::AnnotationsResult;
use crate::graph::EdgeProperties;

/// Builds statement batches from annotation input
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    predicates: &'a PredicateMapper,
    provenance: &'a ProvenanceExtractor,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(predicates: &'a PredicateMapper, provenance: &'a ProvenanceExtractor) -> Self {
        Self {
            predicates,
            provenance,
        }
    }

    /// Replace the lifecycle's edge set: one scoped delete, then one merge
    /// per annotation. The delete always comes first.
    pub fn write(
        &self,
        content_id: &str,
        lifecycle: &str,
        platform_version: &str,
        annotations: &[Annotation],
    ) -> AnnotationsResult<Batch> {
        let edge_types = annotations
            .iter()
            .map(|a| self.predicates.resolve(&a.thing.predicate))
            .collect::<Result<Vec<_>, _>>()?;

        let mut batch = Vec::with_capacity(annotations.len() + 1);
        batch.push(self.delete(content_id, lifecycle));

        for (annotation, edge_type) in annotations.iter().zip(edge_types) {
            let extracted = match annotation.primary_provenance() {
                Some(provenance) => self.provenance.extract(provenance)?,
                None => Default::default(),
            };

            let props = EdgeProperties {
                lifecycle: lifecycle.to_string(),
                platform_version: platform_version.to_string(),
                relevance_score: extracted.relevance,
                confidence_score: extracted.confidence,
                annotated_by: extracted.agent_id,
                annotated_date: extracted.annotated_date,
                annotated_date_epoch: extracted.annotated_date_epoch,
            };

            batch.push(
                Statement::new(StatementKind::MergeAnnotation)
                    .with_param(param::CONTENT_ID, content_id)
                    .with_param(param::CONCEPT_ID, identity::concept_id(&annotation.thing.id))
                    .with_param(param::EDGE_TYPE, edge_type)
                    .with_param(param::PROPERTIES, props.to_properties()),
            );
        }

        Ok(batch)
    }

    /// Remove the lifecycle's edges from a content node
    pub fn delete(&self, content_id: &str, lifecycle: &str) -> Statement {
        Statement::new(StatementKind::DeleteLifecycleEdges)
            .with_param(param::CONTENT_ID, content_id)
            .with_param(param::LIFECYCLE, lifecycle)
    }

    /// Remove the given concepts if nothing references them any more
    pub fn cleanup(&self, content_id: &str, concept_ids: Vec<String>) -> Statement {
        Statement::new(StatementKind::DeleteOrphanConcepts)
            .with_param(param::CONTENT_ID, content_id)
            .with_param(param::CONCEPT_IDS, concept_ids)
    }

    pub fn read(&self, content_id: &str, lifecycle: &str) -> Statement {
        Statement::new(StatementKind::ReadLifecycleEdges)
            .with_param(param::CONTENT_ID, content_id)
            .with_param(param::LIFECYCLE, lifecycle)
    }

    pub fn count(&self, lifecycle: &str, platform_version: &str) -> Statement {
        Statement::new(StatementKind::CountEdges)
            .with_param(param::LIFECYCLE, lifecycle)
            .with_param(param::PLATFORM_VERSION, platform_version)
    }
}
