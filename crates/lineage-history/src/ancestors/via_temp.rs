//! Ancestor resolution through an untracked intermediate value.
//!
//! When an input traces back to the temp sentinel, the dependency existed
//! but was never persisted under a discoverable filename. The search here
//! is best-effort and order-dependent: if several candidates are
//! structurally indistinguishable it may pick a plausible but not
//! necessarily correct link.

use std::cmp::Reverse;

use tracing::debug;

use lineage_core::constants::{BRICK_COLLECTION, KEY_FIELD, TEMP_SENTINEL};
use lineage_core::errors::LineageResult;
use lineage_core::process::value_contains_text;
use lineage_core::{Brick, ExecStatus, Link, Project, ProtoProcess, Value};

use crate::ancestors::direct::{direct_ancestors, Collapse};
use crate::classify::TempPolicy;
use crate::context::TraversalContext;
use crate::scan::filenames_in_value;

/// Resolve ancestors of `proc_id` reachable only through the temp
/// sentinel. Matches are registered in the context, the corresponding
/// links are added to its link set, and the matched identifiers returned.
pub fn temp_ancestors(
    proc_id: &str,
    project: &Project,
    ctx: &mut TraversalContext,
) -> LineageResult<Vec<String>> {
    let Some(process) = ctx.get(proc_id) else {
        return Ok(Vec::new());
    };
    let brick = process.brick.clone();

    // The input parameter the matches will be linked to: the first one
    // referencing the sentinel, fixed for the whole call.
    let Some(temp_input) = temp_param(brick.inputs.iter()) else {
        return Ok(Vec::new());
    };

    let mut matched = local_search(&brick, proc_id, project, ctx)?;
    if matched.is_empty() {
        matched = global_search(&brick, proc_id, project, ctx)?;
    }

    for id in &matched {
        let Some(ancestor) = ctx.get(id) else { continue };
        let Some(temp_output) = temp_param(ancestor.brick.outputs.iter()) else {
            continue;
        };
        ctx.links
            .insert(Link::between(id, &temp_output, proc_id, &temp_input));
    }
    Ok(matched)
}

/// Step 1: among the direct ancestors of the process's own tracked
/// outputs, find temp-producing bricks. Most recent first; first match
/// per scanned output wins.
fn local_search(
    brick: &Brick,
    proc_id: &str,
    project: &Project,
    ctx: &mut TraversalContext,
) -> LineageResult<Vec<String>> {
    let mut matched = Vec::new();
    for output_value in brick.outputs.values() {
        let entries = filenames_in_value(output_value, project, TempPolicy::Deny)?;
        'filenames: for entry in &entries {
            let Some(filename) = entry.as_tracked() else {
                continue;
            };
            let mut candidates =
                direct_ancestors(filename, project, ctx, None, Collapse::KeepAll, None)?;
            candidates.retain(|id| id != proc_id);
            candidates.sort_by_key(|id| Reverse(ctx.exec_time(id)));

            for id in candidates {
                let produces_temp = ctx
                    .get(&id)
                    .is_some_and(|p| p.brick.outputs_reference_temp());
                if produces_temp {
                    debug!(process = %proc_id, ancestor = %id, filename, "via-temp local match");
                    matched.push(id);
                    break 'filenames;
                }
            }
        }
    }
    Ok(matched)
}

/// Step 2: scan every completed brick not after the process's own time for
/// temp-referencing outputs, keeping the co-maximal completion times.
fn global_search(
    brick: &Brick,
    proc_id: &str,
    project: &Project,
    ctx: &mut TraversalContext,
) -> LineageResult<Vec<String>> {
    let mut candidates: Vec<Brick> = Vec::new();
    for doc in project.store().documents(BRICK_COLLECTION, None, None)? {
        let Some(id) = doc.get(KEY_FIELD).and_then(Value::as_text) else {
            continue;
        };
        if id == proc_id {
            continue;
        }
        let candidate = Brick::from_document(id, &doc);
        if candidate.exec_status != ExecStatus::Done {
            continue;
        }
        if let (Some(time), Some(limit)) = (candidate.exec_time, brick.exec_time) {
            if time > limit {
                continue;
            }
        }
        if candidate.outputs_reference_temp() {
            candidates.push(candidate);
        }
    }

    let max_time = candidates.iter().filter_map(|b| b.exec_time).max();
    if max_time.is_some() {
        candidates.retain(|b| b.exec_time == max_time);
    }

    let mut matched = Vec::new();
    for candidate in candidates {
        debug!(process = %proc_id, ancestor = %candidate.id, "via-temp global match");
        let id = candidate.id.clone();
        if !ctx.contains(&id) {
            ctx.register(ProtoProcess::new(candidate));
        }
        matched.push(id);
    }
    Ok(matched)
}

/// First parameter whose value references the temp sentinel.
fn temp_param<'a>(
    mut params: impl Iterator<Item = (&'a String, &'a Value)>,
) -> Option<String> {
    params
        .find(|(_, value)| value_contains_text(value, TEMP_SENTINEL))
        .map(|(name, _)| name.clone())
}
