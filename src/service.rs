//! AnnotationsService: the entry point for annotation persistence
//!
//! Each call is independent: validate, build the statement batch, execute
//! it against the backend, and shape the result. Atomicity comes entirely
//! from the backend executing a batch as one transaction.

use crate::annotation::{identity, Annotation, Annotations, PredicateMapper, ProvenanceExtractor, Thing};
use crate::config::AnnotationsConfig;
use crate::error::{AnnotationsError, AnnotationsResult};
use crate::graph::{EdgeProperties, PropertyValue};
use crate::query::{column, QueryBuilder, Statement};
use crate::storage::{GraphBackend, Row, StatementResult, StorageError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reads and writes lifecycle-scoped annotation sets
pub struct AnnotationsService {
    backend: Arc<dyn GraphBackend>,
    config: Arc<AnnotationsConfig>,
    predicates: PredicateMapper,
    provenance: ProvenanceExtractor,
}

impl AnnotationsService {
    pub fn new(backend: Arc<dyn GraphBackend>, config: Arc<AnnotationsConfig>) -> Self {
        let predicates = PredicateMapper::from_config(&config);
        let provenance = ProvenanceExtractor::from_config(&config);
        Self {
            backend,
            config,
            predicates,
            provenance,
        }
    }

    /// Service with the built-in configuration
    pub fn with_backend(backend: Arc<dyn GraphBackend>) -> Self {
        Self::new(backend, Arc::new(AnnotationsConfig::default()))
    }

    pub fn config(&self) -> &AnnotationsConfig {
        &self.config
    }

    fn queries(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(&self.predicates, &self.provenance)
    }

    /// Platform version configured for a lifecycle
    pub fn platform_version_for(&self, lifecycle: &str) -> Option<&str> {
        self.config.platform_version_for(lifecycle)
    }

    /// Replace the annotation set of `content_id` under `lifecycle`.
    ///
    /// Identifiers are trimmed before use. An empty `platform_version` is
    /// resolved from the lifecycle configuration. Nothing is written unless
    /// every annotation validates.
    pub fn write(
        &self,
        content_id: &str,
        lifecycle: &str,
        platform_version: &str,
        annotations: &[Annotation],
    ) -> AnnotationsResult<()> {
        let (content_id, lifecycle) = (content_id.trim(), lifecycle.trim());
        validate_write(content_id, lifecycle, annotations)?;

        let platform_version = if platform_version.is_empty() {
            self.platform_version_for(lifecycle).ok_or_else(|| {
                AnnotationsError::Validation(format!(
                    "no platform version given or configured for lifecycle {}",
                    lifecycle
                ))
            })?
        } else {
            platform_version
        };

        let batch = self
            .queries()
            .write(content_id, lifecycle, platform_version, annotations)?;
        debug!(content_id, lifecycle, statements = batch.len(), "executing write batch");

        let results = self.execute(&batch)?;
        info!(
            content_id,
            lifecycle,
            platform_version,
            replaced = results[0].mutations,
            written = annotations.len(),
            "annotations written"
        );
        Ok(())
    }

    /// Annotation set of `content_id` under `lifecycle`; `None` when no edge
    /// matches.
    pub fn read(&self, content_id: &str, lifecycle: &str) -> AnnotationsResult<Option<Annotations>> {
        let (content_id, lifecycle) = (content_id.trim(), lifecycle.trim());
        let batch = vec![self.queries().read(content_id, lifecycle)];
        let result = self.execute_single(&batch)?;

        if result.rows.is_empty() {
            return Ok(None);
        }

        let roots: BTreeSet<&str> = result
            .rows
            .iter()
            .filter_map(|row| row.get(column::CONTENT_ID).and_then(PropertyValue::as_str))
            .collect();
        if roots.len() > 1 {
            warn!(content_id, lifecycle, roots = roots.len(), "multiple content roots matched");
            return Err(AnnotationsError::AmbiguousResult(format!(
                "{} content nodes matched identifier {}",
                roots.len(),
                content_id
            )));
        }

        let mut annotations = result
            .rows
            .iter()
            .map(|row| self.shape(row))
            .collect::<AnnotationsResult<Annotations>>()?;
        annotations.sort_by(|a, b| {
            (a.thing.id.as_str(), a.thing.predicate.as_str())
                .cmp(&(b.thing.id.as_str(), b.thing.predicate.as_str()))
        });

        Ok(Some(annotations))
    }

    /// Remove the annotation set of `content_id` under `lifecycle`. Returns
    /// whether any edge was removed.
    pub fn delete(&self, content_id: &str, lifecycle: &str) -> AnnotationsResult<bool> {
        let (content_id, lifecycle) = (content_id.trim(), lifecycle.trim());
        let batch = vec![self.queries().delete(content_id, lifecycle)];
        let result = self.execute_single(&batch)?;
        let found = result.mutations > 0;

        if found && self.config.cleanup_orphan_concepts {
            let candidates: BTreeSet<String> = result
                .rows
                .iter()
                .filter_map(|row| row.get(column::CONCEPT_ID).and_then(PropertyValue::as_str))
                .map(str::to_string)
                .collect();

            if !candidates.is_empty() {
                let cleanup = vec![self.queries().cleanup(content_id, candidates.into_iter().collect())];
                let removed = self.execute_single(&cleanup)?.mutations;
                debug!(content_id, removed, "orphaned concepts removed");
            }
        }

        info!(content_id, lifecycle, removed = result.mutations, "annotations deleted");
        Ok(found)
    }

    /// Number of annotation edges tagged with both values
    pub fn count(&self, lifecycle: &str, platform_version: &str) -> AnnotationsResult<usize> {
        let batch = vec![self.queries().count(lifecycle, platform_version)];
        let result = self.execute_single(&batch)?;

        let count = result
            .rows
            .first()
            .and_then(|row| row.get(column::COUNT))
            .and_then(PropertyValue::as_i64)
            .ok_or_else(|| StorageError::UnexpectedResult("count statement returned no count".to_string()))?;

        usize::try_from(count)
            .map_err(|_| StorageError::UnexpectedResult(format!("negative count {}", count)).into())
    }

    /// Backend connectivity check
    pub fn check(&self) -> AnnotationsResult<()> {
        self.backend.check()?;
        Ok(())
    }

    fn execute(&self, batch: &[Statement]) -> AnnotationsResult<Vec<StatementResult>> {
        let results = self.backend.execute(batch)?;
        if results.len() != batch.len() {
            return Err(StorageError::UnexpectedResult(format!(
                "{} results for {} statements",
                results.len(),
                batch.len()
            ))
            .into());
        }
        Ok(results)
    }

    fn execute_single(&self, batch: &[Statement]) -> AnnotationsResult<StatementResult> {
        let mut results = self.execute(batch)?;
        Ok(results.remove(0))
    }

    /// Rebuild one annotation from a read row
    fn shape(&self, row: &Row) -> AnnotationsResult<Annotation> {
        let text = |name: &str| row.get(name).and_then(PropertyValue::as_str);

        let concept_id = text(column::CONCEPT_ID)
            .ok_or_else(|| StorageError::UnexpectedResult(format!("row without {}", column::CONCEPT_ID)))?;
        let edge_type = text(column::EDGE_TYPE)
            .ok_or_else(|| StorageError::UnexpectedResult(format!("row without {}", column::EDGE_TYPE)))?;

        let predicate = self
            .predicates
            .predicate_for(edge_type)
            .unwrap_or(edge_type)
            .to_string();
        let props = EdgeProperties::from_properties(row);

        let thing = Thing {
            id: identity::to_uri(&self.config.thing_uri_prefix, concept_id),
            pref_label: text(column::PREF_LABEL).map(str::to_string),
            types: row
                .get(column::TYPES)
                .map(PropertyValue::to_string_vec)
                .unwrap_or_default(),
            predicate,
        };
        let provenance = self.provenance.rebuild(
            props.relevance_score,
            props.confidence_score,
            &props.annotated_by,
            &props.annotated_date,
        );

        Ok(Annotation::new(thing).with_provenance(provenance))
    }
}

fn validate_write(content_id: &str, lifecycle: &str, annotations: &[Annotation]) -> AnnotationsResult<()> {
    if content_id.is_empty() {
        return Err(AnnotationsError::Validation("content identifier is empty".to_string()));
    }
    if lifecycle.is_empty() {
        return Err(AnnotationsError::Validation("lifecycle is empty".to_string()));
    }
    for (index, annotation) in annotations.iter().enumerate() {
        if identity::concept_id(&annotation.thing.id).is_empty() {
            return Err(AnnotationsError::Validation(format!(
                "annotation {} has an empty concept identifier",
                index
            )));
        }
    }
    Ok(())
}
