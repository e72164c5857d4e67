//! SQLite storage backend
//!
//! Nodes and edges live in two tables. An edge is identified by
//! (source, target, edge type, lifecycle), so each lifecycle owns its own
//! edge between two nodes. Untagged edges have a NULL lifecycle and are
//! never matched by a lifecycle-scoped statement.

use super::traits::{GraphBackend, OpenStore, Row, StatementResult, StorageError, StorageResult};
use crate::graph::{edge, EdgeProperties, PropertyValue};
use crate::query::{column, param, Statement, StatementKind};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed graph store
///
/// Thread-safe via internal mutex on the connection. Every batch runs in
/// its own SQLite transaction.
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Content and concept nodes, merged by identifier
            CREATE TABLE IF NOT EXISTS nodes (
                id TEXT PRIMARY KEY,
                pref_label TEXT,
                types_json TEXT NOT NULL DEFAULT '[]'
            );

            -- Relationships; annotation edges carry a lifecycle
            CREATE TABLE IF NOT EXISTS edges (
                source_id TEXT NOT NULL,
                target_id TEXT NOT NULL,
                edge_type TEXT NOT NULL,
                lifecycle TEXT,
                platform_version TEXT,
                relevance_score REAL NOT NULL DEFAULT 0,
                confidence_score REAL NOT NULL DEFAULT 0,
                annotated_by TEXT NOT NULL DEFAULT '',
                annotated_date TEXT NOT NULL DEFAULT '',
                annotated_date_epoch INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (source_id) REFERENCES nodes(id),
                FOREIGN KEY (target_id) REFERENCES nodes(id)
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_edges_identity
                ON edges(source_id, target_id, edge_type, lifecycle);
            CREATE INDEX IF NOT EXISTS idx_edges_source_lifecycle
                ON edges(source_id, lifecycle);
            CREATE INDEX IF NOT EXISTS idx_edges_target
                ON edges(target_id);
            CREATE INDEX IF NOT EXISTS idx_edges_lifecycle_version
                ON edges(lifecycle, platform_version);

            PRAGMA foreign_keys = ON;

            -- Readers do not block on an in-flight write transaction
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn required_str<'s>(statement: &'s Statement, name: &str) -> StorageResult<&'s str> {
        match statement.param(name) {
            Some(PropertyValue::String(s)) => Ok(s.as_str()),
            Some(_) => Err(StorageError::InvalidParameter {
                name: name.to_string(),
                expected: "string".to_string(),
            }),
            None => Err(StorageError::MissingParameter(name.to_string())),
        }
    }

    fn run(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        match statement.kind {
            StatementKind::DeleteLifecycleEdges => Self::delete_lifecycle_edges(conn, statement),
            StatementKind::MergeAnnotation => Self::merge_annotation(conn, statement),
            StatementKind::ReadLifecycleEdges => Self::read_lifecycle_edges(conn, statement),
            StatementKind::CountEdges => Self::count_edges(conn, statement),
            StatementKind::DeleteOrphanConcepts => Self::delete_orphan_concepts(conn, statement),
        }
    }

    fn delete_lifecycle_edges(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        let content_id = Self::required_str(statement, param::CONTENT_ID)?;
        let lifecycle = Self::required_str(statement, param::LIFECYCLE)?;

        let mut stmt = conn.prepare(
            "SELECT target_id FROM edges WHERE source_id = ?1 AND lifecycle = ?2 ORDER BY target_id",
        )?;
        let targets = stmt
            .query_map(params![content_id, lifecycle], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let removed = conn.execute(
            "DELETE FROM edges WHERE source_id = ?1 AND lifecycle = ?2",
            params![content_id, lifecycle],
        )?;

        let rows = targets
            .into_iter()
            .map(|target| {
                let mut row = Row::new();
                row.insert(column::CONCEPT_ID.to_string(), target.into());
                row
            })
            .collect();

        Ok(StatementResult {
            rows,
            mutations: removed,
        })
    }

    fn merge_annotation(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        let content_id = Self::required_str(statement, param::CONTENT_ID)?;
        let concept_id = Self::required_str(statement, param::CONCEPT_ID)?;
        let edge_type = Self::required_str(statement, param::EDGE_TYPE)?;
        let props = statement
            .param(param::PROPERTIES)
            .ok_or_else(|| StorageError::MissingParameter(param::PROPERTIES.to_string()))?
            .as_object()
            .ok_or_else(|| StorageError::InvalidParameter {
                name: param::PROPERTIES.to_string(),
                expected: "object".to_string(),
            })?;
        if !props.contains_key(edge::LIFECYCLE) {
            return Err(StorageError::MissingParameter(format!(
                "{}.{}",
                param::PROPERTIES,
                edge::LIFECYCLE
            )));
        }
        let props = EdgeProperties::from_properties(props);

        Self::merge_node(conn, content_id)?;
        Self::merge_node(conn, concept_id)?;

        conn.execute(
            r#"
            INSERT INTO edges (source_id, target_id, edge_type, lifecycle, platform_version,
                               relevance_score, confidence_score, annotated_by,
                               annotated_date, annotated_date_epoch)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(source_id, target_id, edge_type, lifecycle) DO UPDATE SET
                platform_version = excluded.platform_version,
                relevance_score = excluded.relevance_score,
                confidence_score = excluded.confidence_score,
                annotated_by = excluded.annotated_by,
                annotated_date = excluded.annotated_date,
                annotated_date_epoch = excluded.annotated_date_epoch
            "#,
            params![
                content_id,
                concept_id,
                edge_type,
                props.lifecycle,
                props.platform_version,
                props.relevance_score,
                props.confidence_score,
                props.annotated_by,
                props.annotated_date,
                props.annotated_date_epoch,
            ],
        )?;

        Ok(StatementResult::mutations(1))
    }

    fn read_lifecycle_edges(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        let content_id = Self::required_str(statement, param::CONTENT_ID)?;
        let lifecycle = Self::required_str(statement, param::LIFECYCLE)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT e.source_id, e.target_id, n.pref_label, n.types_json, e.edge_type,
                   e.lifecycle, e.platform_version, e.relevance_score, e.confidence_score,
                   e.annotated_by, e.annotated_date, e.annotated_date_epoch
            FROM edges e
            JOIN nodes n ON n.id = e.target_id
            WHERE e.source_id = ?1 AND e.lifecycle = ?2
            ORDER BY e.target_id, e.edge_type
            "#,
        )?;

        let raw = stmt
            .query_map(params![content_id, lifecycle], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    EdgeProperties {
                        lifecycle: row.get(5)?,
                        platform_version: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                        relevance_score: row.get(7)?,
                        confidence_score: row.get(8)?,
                        annotated_by: row.get(9)?,
                        annotated_date: row.get(10)?,
                        annotated_date_epoch: row.get(11)?,
                    },
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(raw.len());
        for (source, target, label, types_json, edge_type, props) in raw {
            let types: Vec<String> = serde_json::from_str(&types_json)?;
            let mut row = props.to_properties();
            row.insert(column::CONTENT_ID.to_string(), source.into());
            row.insert(column::CONCEPT_ID.to_string(), target.into());
            if let Some(label) = label {
                row.insert(column::PREF_LABEL.to_string(), label.into());
            }
            row.insert(column::TYPES.to_string(), types.into());
            row.insert(column::EDGE_TYPE.to_string(), edge_type.into());
            rows.push(row);
        }

        Ok(StatementResult::rows(rows))
    }

    fn count_edges(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        let lifecycle = Self::required_str(statement, param::LIFECYCLE)?;
        let platform_version = Self::required_str(statement, param::PLATFORM_VERSION)?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM edges WHERE lifecycle = ?1 AND platform_version = ?2",
            params![lifecycle, platform_version],
            |row| row.get(0),
        )?;

        let mut row = Row::new();
        row.insert(column::COUNT.to_string(), count.into());
        Ok(StatementResult::rows(vec![row]))
    }

    fn delete_orphan_concepts(conn: &Connection, statement: &Statement) -> StorageResult<StatementResult> {
        let content_id = Self::required_str(statement, param::CONTENT_ID)?;
        let concept_ids = statement
            .param(param::CONCEPT_IDS)
            .ok_or_else(|| StorageError::MissingParameter(param::CONCEPT_IDS.to_string()))?
            .to_string_vec();

        let mut deleted = 0;
        for concept_id in &concept_ids {
            deleted += conn.execute(
                r#"
                DELETE FROM nodes
                WHERE id = ?1 AND id <> ?2
                  AND NOT EXISTS (SELECT 1 FROM edges WHERE source_id = ?1 OR target_id = ?1)
                "#,
                params![concept_id, content_id],
            )?;
        }

        Ok(StatementResult::mutations(deleted))
    }

    fn merge_node(conn: &Connection, id: &str) -> StorageResult<()> {
        conn.execute(
            "INSERT INTO nodes (id) VALUES (?1) ON CONFLICT(id) DO NOTHING",
            params![id],
        )?;
        Ok(())
    }

    // === Backend-native helpers ===

    /// Create or enrich a concept node with its label and ontology types
    pub fn merge_concept(&self, id: &str, pref_label: Option<&str>, types: &[String]) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let types_json = serde_json::to_string(types)?;
        conn.execute(
            r#"
            INSERT INTO nodes (id, pref_label, types_json) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                pref_label = excluded.pref_label,
                types_json = excluded.types_json
            "#,
            params![id, pref_label, types_json],
        )?;
        Ok(())
    }

    /// Create an untagged relationship, e.g. a curated classification.
    /// Returns false if it already existed.
    pub fn link(&self, source_id: &str, target_id: &str, edge_type: &str) -> StorageResult<bool> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        Self::merge_node(&tx, source_id)?;
        Self::merge_node(&tx, target_id)?;

        let existing: Option<i64> = tx
            .query_row(
                r#"
                SELECT 1 FROM edges
                WHERE source_id = ?1 AND target_id = ?2 AND edge_type = ?3 AND lifecycle IS NULL
                "#,
                params![source_id, target_id, edge_type],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Ok(false);
        }

        tx.execute(
            "INSERT INTO edges (source_id, target_id, edge_type) VALUES (?1, ?2, ?3)",
            params![source_id, target_id, edge_type],
        )?;
        tx.commit()?;
        Ok(true)
    }

    pub fn node_exists(&self, id: &str) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row("SELECT 1 FROM nodes WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of relationships touching a node, in either direction
    pub fn relationship_count(&self, id: &str) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM edges WHERE source_id = ?1 OR target_id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl OpenStore for SqliteBackend {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl GraphBackend for SqliteBackend {
    fn execute(&self, batch: &[Statement]) -> StorageResult<Vec<StatementResult>> {
        let mut conn = self.conn.lock().unwrap();
        // Dropping the transaction without commit rolls the batch back
        let tx = conn.transaction()?;

        let mut results = Vec::with_capacity(batch.len());
        for statement in batch {
            results.push(Self::run(&tx, statement)?);
        }

        tx.commit()?;
        Ok(results)
    }

    fn check(&self) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
