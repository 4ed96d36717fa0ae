//! Direct ancestor resolution for a tracked filename.

use chrono::{DateTime, Utc};
use tracing::debug;

use lineage_core::constants::{BRICK_HISTORY_FIELD, CURRENT_COLLECTION};
use lineage_core::errors::LineageResult;
use lineage_core::{Project, Value};

use crate::brick_loader::load_brick_process;
use crate::context::TraversalContext;

/// Tie-break policy for candidate ancestors.
///
/// `LatestOnly` keeps every candidate sharing the maximum completion time:
/// the log may record several bricks in the same execution batch, and
/// silently dropping one would produce an incomplete history. `KeepAll`
/// skips the collapse entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collapse {
    LatestOnly,
    KeepAll,
}

/// Resolve the bricks recorded against `filename`, register them in the
/// context, and return the kept identifiers.
///
/// Already-registered bricks are re-admitted only while they still satisfy
/// the cutoff. With `Collapse::LatestOnly`, `origin` (if given) is exempt
/// from the latest-time comparison and reinserted afterwards when it was
/// itself a candidate.
pub fn direct_ancestors(
    filename: &str,
    project: &Project,
    ctx: &mut TraversalContext,
    cutoff: Option<DateTime<Utc>>,
    collapse: Collapse,
    origin: Option<&str>,
) -> LineageResult<Vec<String>> {
    let mut candidates = Vec::new();
    for id in brick_history_ids(filename, project)? {
        if ctx.contains(&id) {
            let satisfies_cutoff = match (cutoff, ctx.exec_time(&id)) {
                (None, _) => true,
                (Some(cutoff), Some(time)) => time <= cutoff,
                (Some(_), None) => true,
            };
            if satisfies_cutoff {
                candidates.push(id);
            }
        } else if let Some(process) = load_brick_process(&id, project, cutoff)? {
            ctx.register(process);
            candidates.push(id);
        }
    }

    match collapse {
        Collapse::KeepAll => Ok(candidates),
        Collapse::LatestOnly => Ok(collapse_to_latest(ctx, filename, candidates, origin)),
    }
}

/// Keep every candidate sharing the maximum completion time; candidates
/// with a strictly earlier time were overwritten at this filename.
fn collapse_to_latest(
    ctx: &TraversalContext,
    filename: &str,
    candidates: Vec<String>,
    origin: Option<&str>,
) -> Vec<String> {
    let origin_is_candidate =
        origin.is_some_and(|o| candidates.iter().any(|id| id == o));
    let comparison: Vec<String> = candidates
        .into_iter()
        .filter(|id| Some(id.as_str()) != origin)
        .collect();

    let Some(max_time) = comparison.iter().filter_map(|id| ctx.exec_time(id)).max() else {
        // No timed candidate to compare against: keep everything.
        return reinsert_origin(comparison, origin, origin_is_candidate);
    };

    let mut kept = Vec::new();
    for id in comparison {
        if ctx.exec_time(&id) == Some(max_time) {
            kept.push(id);
        } else {
            debug!(filename, process = %id, "dropping overwritten ancestor");
        }
    }
    reinsert_origin(kept, origin, origin_is_candidate)
}

fn reinsert_origin(mut kept: Vec<String>, origin: Option<&str>, reinsert: bool) -> Vec<String> {
    if reinsert {
        if let Some(origin) = origin {
            kept.push(origin.to_string());
        }
    }
    kept
}

/// The brick identifiers recorded against a filename, oldest first.
/// Missing or malformed history reads as empty.
fn brick_history_ids(filename: &str, project: &Project) -> LineageResult<Vec<String>> {
    let ids = match project
        .store()
        .get_value(CURRENT_COLLECTION, filename, BRICK_HISTORY_FIELD)?
    {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|v| v.as_text().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };
    Ok(ids)
}
