//! Brick loading with the completion-status and temporal-cutoff gate.

use chrono::{DateTime, Utc};

use lineage_core::constants::BRICK_COLLECTION;
use lineage_core::errors::LineageResult;
use lineage_core::{Brick, ExecStatus, Project, ProtoProcess};

/// Fetch one brick by identifier and wrap it as a `ProtoProcess`.
///
/// Returns `None` for an absent brick, a brick that never completed, or
/// one that completed strictly after `cutoff`. This is the single gate
/// enforcing temporal causality: an ancestor's completion time must not
/// exceed the descendant event's completion time.
pub fn load_brick_process(
    id: &str,
    project: &Project,
    cutoff: Option<DateTime<Utc>>,
) -> LineageResult<Option<ProtoProcess>> {
    let Some(doc) = project.store().get_document(BRICK_COLLECTION, id)? else {
        return Ok(None);
    };
    let brick = Brick::from_document(id, &doc);
    if brick.exec_status != ExecStatus::Done {
        return Ok(None);
    }
    if let (Some(cutoff), Some(time)) = (cutoff, brick.exec_time) {
        if time > cutoff {
            return Ok(None);
        }
    }
    Ok(Some(ProtoProcess::new(brick)))
}
