//! Test fixture builders for the Lineage workspace.
//!
//! `ProjectBuilder` assembles an in-memory document store populated the way
//! the surrounding system records provenance: one "brick" document per
//! processing step, and per-filename "current" documents whose `bricks`
//! field lists producing brick identifiers, oldest first.

use chrono::{DateTime, TimeZone, Utc};

use lineage_core::constants::{BRICK_COLLECTION, BRICK_HISTORY_FIELD, CURRENT_COLLECTION};
use lineage_core::{Brick, ExecStatus, IDocumentStore, ParamMap, Project, Value};
use lineage_store::DocumentStore;

/// Deterministic fixture timestamp: a fixed base plus `minutes`.
pub fn t(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Install a test tracing subscriber honoring `RUST_LOG`. Safe to call from
/// every test; only the first call wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builder for one brick fixture.
pub struct BrickFixture {
    id: String,
    name: String,
    inputs: ParamMap,
    outputs: ParamMap,
    exec_status: ExecStatus,
    exec_time: Option<DateTime<Utc>>,
}

/// Start a brick fixture with a random identifier and `NotDone` status.
pub fn brick(name: &str) -> BrickFixture {
    BrickFixture {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        inputs: ParamMap::new(),
        outputs: ParamMap::new(),
        exec_status: ExecStatus::NotDone,
        exec_time: None,
    }
}

impl BrickFixture {
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn input(mut self, param: &str, value: impl Into<Value>) -> Self {
        self.inputs.insert(param.to_string(), value.into());
        self
    }

    pub fn output(mut self, param: &str, value: impl Into<Value>) -> Self {
        self.outputs.insert(param.to_string(), value.into());
        self
    }

    /// Mark the brick `Done` at the given time.
    pub fn done_at(mut self, time: DateTime<Utc>) -> Self {
        self.exec_status = ExecStatus::Done;
        self.exec_time = Some(time);
        self
    }

    pub fn build(self) -> Brick {
        Brick {
            id: self.id,
            name: self.name,
            inputs: self.inputs,
            outputs: self.outputs,
            exec_status: self.exec_status,
            exec_time: self.exec_time,
        }
    }
}

impl From<BrickFixture> for Brick {
    fn from(fixture: BrickFixture) -> Self {
        fixture.build()
    }
}

/// Builder assembling a `Project` over an in-memory store.
pub struct ProjectBuilder {
    store: DocumentStore,
    data_root: String,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            store: DocumentStore::open_in_memory().expect("in-memory store"),
            data_root: "/data/project".to_string(),
        }
    }

    /// Register a tracked filename with no producing bricks (a fresh
    /// external file).
    pub fn tracked(self, filename: &str) -> Self {
        self.with_history(filename, &[])
    }

    /// Register a tracked filename with an explicit brick history,
    /// oldest first.
    pub fn with_history(self, filename: &str, brick_ids: &[&str]) -> Self {
        let ids = Value::Sequence(brick_ids.iter().map(|id| Value::from(*id)).collect());
        self.store
            .set_value(CURRENT_COLLECTION, filename, BRICK_HISTORY_FIELD, &ids)
            .expect("write current document");
        self
    }

    /// Record a brick and append its identifier to the history of every
    /// tracked filename appearing in its outputs.
    pub fn with_brick(self, brick: impl Into<Brick>) -> Self {
        let brick = brick.into();
        self.store
            .set_document(BRICK_COLLECTION, &brick.id, &brick.to_document())
            .expect("write brick document");
        for value in brick.outputs.values() {
            for filename in text_leaves(value) {
                if filename == lineage_core::constants::TEMP_SENTINEL {
                    continue;
                }
                append_history(&self.store, &filename, &brick.id);
            }
        }
        self
    }

    /// Record a brick document without touching any filename history
    /// (for orphaned or hand-wired scenarios).
    pub fn with_brick_document_only(self, brick: impl Into<Brick>) -> Self {
        let brick = brick.into();
        self.store
            .set_document(BRICK_COLLECTION, &brick.id, &brick.to_document())
            .expect("write brick document");
        self
    }

    pub fn build(self) -> Project {
        Project::new(self.data_root, Box::new(self.store))
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn append_history(store: &DocumentStore, filename: &str, brick_id: &str) {
    let mut ids = match store
        .get_value(CURRENT_COLLECTION, filename, BRICK_HISTORY_FIELD)
        .expect("read current document")
    {
        Some(Value::Sequence(ids)) => ids,
        _ => Vec::new(),
    };
    ids.push(Value::from(brick_id));
    store
        .set_value(
            CURRENT_COLLECTION,
            filename,
            BRICK_HISTORY_FIELD,
            &Value::Sequence(ids),
        )
        .expect("write current document");
}

fn text_leaves(value: &Value) -> Vec<String> {
    match value {
        Value::Text(s) => vec![s.clone()],
        Value::Sequence(items) => items.iter().flat_map(text_leaves).collect(),
        Value::Mapping(entries) => entries.values().flat_map(text_leaves).collect(),
        Value::Null | Value::Bool(_) | Value::Number(_) => Vec::new(),
    }
}
