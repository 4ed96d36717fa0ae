//! Brick records and their per-traversal wrapper.

use chrono::{DateTime, Utc};

use crate::constants;
use crate::traits::Document;
use crate::value::{ParamMap, Value};

/// Completion status of a brick. Anything other than the literal `"Done"`
/// in the stored document maps to `NotDone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Done,
    NotDone,
}

impl ExecStatus {
    pub fn from_label(label: &str) -> Self {
        if label == "Done" {
            ExecStatus::Done
        } else {
            ExecStatus::NotDone
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExecStatus::Done => "Done",
            ExecStatus::NotDone => "NotDone",
        }
    }
}

/// An immutable record of one processing step: qualified name, named
/// inputs/outputs, completion status, and completion time.
///
/// Bricks are append-only in the store; this core never mutates them.
#[derive(Debug, Clone)]
pub struct Brick {
    /// Opaque unique identifier (primary key in the brick collection).
    pub id: String,
    /// Qualified process name, e.g. `"morpho.segmentation.split"`.
    pub name: String,
    pub inputs: ParamMap,
    pub outputs: ParamMap,
    pub exec_status: ExecStatus,
    /// Present only when `exec_status` is `Done`.
    pub exec_time: Option<DateTime<Utc>>,
}

impl Brick {
    /// Build a brick from its stored document. A missing or malformed field
    /// reads as "no data" (empty mapping, `NotDone`, no timestamp) so that a
    /// partially-corrupt log never aborts a traversal.
    pub fn from_document(id: &str, doc: &Document) -> Self {
        let name = doc
            .get("name")
            .and_then(Value::as_text)
            .unwrap_or_default()
            .to_string();
        let inputs = doc
            .get("inputs")
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();
        let outputs = doc
            .get("outputs")
            .and_then(Value::as_mapping)
            .cloned()
            .unwrap_or_default();
        let exec_status = doc
            .get("exec_status")
            .and_then(Value::as_text)
            .map(ExecStatus::from_label)
            .unwrap_or(ExecStatus::NotDone);
        let exec_time = doc
            .get("exec_time")
            .and_then(Value::as_text)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));

        Self {
            id: id.to_string(),
            name,
            inputs,
            outputs,
            exec_status,
            exec_time,
        }
    }

    /// Serialize back into document form (used by writers and fixtures).
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name".to_string(), Value::Text(self.name.clone()));
        doc.insert("inputs".to_string(), Value::Mapping(self.inputs.clone()));
        doc.insert("outputs".to_string(), Value::Mapping(self.outputs.clone()));
        doc.insert(
            "exec_status".to_string(),
            Value::Text(self.exec_status.label().to_string()),
        );
        if let Some(t) = self.exec_time {
            doc.insert("exec_time".to_string(), Value::Text(t.to_rfc3339()));
        }
        doc
    }

    /// Short display name: the last segment of the qualified name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Whether any output parameter value contains the temp sentinel.
    pub fn outputs_reference_temp(&self) -> bool {
        self.outputs
            .values()
            .any(|v| value_contains_text(v, constants::TEMP_SENTINEL))
    }
}

/// Depth-first containment check for a text leaf inside a nested value.
pub fn value_contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::Text(s) => s == needle,
        Value::Sequence(items) => items.iter().any(|v| value_contains_text(v, needle)),
        Value::Mapping(entries) => entries.values().any(|v| value_contains_text(v, needle)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// A brick paired with a `used` flag, scoped to a single traversal run.
///
/// `used = true` marks the brick as contributing to the reconstructed
/// history; unused entries are superseded/orphaned branches kept in the
/// registry only to avoid refetching.
#[derive(Debug, Clone)]
pub struct ProtoProcess {
    pub brick: Brick,
    pub used: bool,
}

impl ProtoProcess {
    pub fn new(brick: Brick) -> Self {
        Self { brick, used: false }
    }

    /// Completion time of the underlying brick, when recorded.
    pub fn exec_time(&self) -> Option<DateTime<Utc>> {
        self.brick.exec_time
    }
}
