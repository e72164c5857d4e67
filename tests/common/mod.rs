//! Shared helpers for annotation integration tests

#![allow(dead_code)]

use annotations_rw::{
    Annotation, AnnotationsService, GraphBackend, OpenStore, Provenance, SqliteBackend, Statement,
    StatementResult, StorageResult, Thing,
};
use annotations_rw::config::{CONFIDENCE_SCORING_SYSTEM, RELEVANCE_SCORING_SYSTEM};
use std::sync::{Arc, Mutex};

pub const CONTENT_ID: &str = "3fc9fe3e-af8c-4f7f-961a-e5065392bb31";
pub const LIFECYCLE_V1: &str = "annotations-v1";
pub const LIFECYCLE_V2: &str = "annotations-v2";
pub const AGENT_URI: &str = "http://api.ft.com/things/0edd3c31-1fd0-4ef6-9230-8d545be3880a";
pub const AT_TIME: &str = "2016-01-01T19:43:47.314Z";

/// Wraps a SQLite backend and records every batch it executes
pub struct RecordingBackend {
    inner: SqliteBackend,
    batches: Mutex<Vec<Vec<Statement>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            inner: SqliteBackend::open_in_memory().unwrap(),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn sqlite(&self) -> &SqliteBackend {
        &self.inner
    }

    pub fn batches(&self) -> Vec<Vec<Statement>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

impl GraphBackend for RecordingBackend {
    fn execute(&self, batch: &[Statement]) -> StorageResult<Vec<StatementResult>> {
        self.batches.lock().unwrap().push(batch.to_vec());
        self.inner.execute(batch)
    }

    fn check(&self) -> StorageResult<()> {
        self.inner.check()
    }
}

/// A service over a fresh in-memory store, plus the store itself
pub fn service() -> (AnnotationsService, Arc<RecordingBackend>) {
    let backend = Arc::new(RecordingBackend::new());
    (AnnotationsService::with_backend(backend.clone()), backend)
}

pub fn annotation(concept: &str, predicate: &str, relevance: f64, confidence: f64) -> Annotation {
    Annotation::new(Thing::new(concept).with_predicate(predicate)).with_provenance(
        Provenance::new(AGENT_URI, AT_TIME)
            .with_score(RELEVANCE_SCORING_SYSTEM, relevance)
            .with_score(CONFIDENCE_SCORING_SYSTEM, confidence),
    )
}

pub fn concept_uri(uuid: &str) -> String {
    format!("http://api.ft.com/things/{}", uuid)
}

/// Concept ids of a read result, in order
pub fn ids(annotations: &[Annotation]) -> Vec<String> {
    annotations.iter().map(|a| a.thing.id.clone()).collect()
}
