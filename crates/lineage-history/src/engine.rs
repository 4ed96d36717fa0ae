//! The worklist-based history traversal.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use lineage_core::errors::{HistoryError, LineageResult};
use lineage_core::process::value_contains_text;
use lineage_core::{DataEntry, Link, Project, ProtoProcess, TraversalLimits};

use crate::ancestors::{direct_ancestors, temp_ancestors, Collapse};
use crate::classify::{is_data_entry, TempPolicy};
use crate::context::TraversalContext;
use crate::scan::filenames_in_value;

/// Everything one traversal produced: the full registry (used and unused
/// processes) and the provenance links among used processes plus boundary
/// links to the external scope.
#[derive(Debug, Default)]
pub struct HistoryResult {
    pub registry: HashMap<String, ProtoProcess>,
    pub links: HashSet<Link>,
}

impl HistoryResult {
    /// The processes that causally contribute to the queried file's
    /// latest state.
    pub fn used(&self) -> impl Iterator<Item = &ProtoProcess> {
        self.registry.values().filter(|p| p.used)
    }

    /// Whether any usable history was reconstructed.
    pub fn has_history(&self) -> bool {
        self.used().next().is_some()
    }
}

/// The central graph walker. Starts from a tracked file, repeatedly
/// resolves ancestors strictly backward in time, and discards superseded
/// branches.
///
/// The store is read as-is for the duration of one call; no snapshot
/// isolation is taken against concurrent writers.
pub struct HistoryEngine<'a> {
    project: &'a Project,
    limits: TraversalLimits,
}

impl<'a> HistoryEngine<'a> {
    pub fn new(project: &'a Project) -> Self {
        Self {
            project,
            limits: TraversalLimits::default(),
        }
    }

    pub fn with_limits(project: &'a Project, limits: TraversalLimits) -> Self {
        Self { project, limits }
    }

    /// Reconstruct the provenance history of `filename`.
    ///
    /// An untracked filename, or one with no recorded bricks, yields an
    /// empty result; "no provenance recorded" is a valid outcome.
    pub fn data_history(&self, filename: &str) -> LineageResult<HistoryResult> {
        let mut ctx = TraversalContext::new();

        let target = match is_data_entry(filename, self.project, TempPolicy::Deny)? {
            Some(DataEntry::Tracked(relative)) => relative,
            _ => {
                debug!(filename, "not a tracked entry");
                return Ok(HistoryResult::default());
            }
        };

        // Initial candidates, collapsed per-filename by the resolver, then
        // collapsed once more across the whole seed set. The second pass is
        // not redundant: the resolver's collapse is per-filename only.
        let initial = direct_ancestors(
            &target,
            self.project,
            &mut ctx,
            None,
            Collapse::LatestOnly,
            None,
        )?;
        let seeds = collapse_seeds(&ctx, initial);

        let mut worklist: VecDeque<String> = seeds.iter().cloned().collect();
        let mut processed = 0usize;

        while let Some(proc_id) = worklist.pop_front() {
            if ctx.visited.contains(&proc_id) {
                continue;
            }
            processed += 1;
            if processed > self.limits.max_processes {
                return Err(HistoryError::TraversalCeiling {
                    max_processes: self.limits.max_processes,
                }
                .into());
            }
            ctx.visited.insert(proc_id.clone());
            ctx.mark_used(&proc_id);

            let Some(process) = ctx.get(&proc_id) else {
                continue;
            };
            let brick = process.brick.clone();

            for (input_param, input_value) in &brick.inputs {
                let entries = filenames_in_value(input_value, self.project, TempPolicy::Allow)?;
                for entry in &entries {
                    match entry {
                        DataEntry::Temp => {
                            for id in temp_ancestors(&proc_id, self.project, &mut ctx)? {
                                if !ctx.visited.contains(&id) {
                                    worklist.push_back(id);
                                }
                            }
                        }
                        DataEntry::Tracked(referenced) => {
                            self.resolve_tracked_input(
                                &proc_id,
                                input_param,
                                referenced,
                                brick.exec_time,
                                &mut ctx,
                                &mut worklist,
                            )?;
                        }
                    }
                }
            }
        }

        // Expose every seed output matching the queried file to the caller.
        for seed_id in &seeds {
            let Some(process) = ctx.get(seed_id) else {
                continue;
            };
            let exported: Vec<String> = process
                .brick
                .outputs
                .iter()
                .filter(|(_, value)| value_contains_text(value, &target))
                .map(|(param, _)| param.clone())
                .collect();
            for param in exported {
                ctx.links.insert(Link::to_boundary(seed_id, &param));
            }
        }

        info!(
            filename = %target,
            processes = ctx.registry.len(),
            used = ctx.registry.values().filter(|p| p.used).count(),
            links = ctx.links.len(),
            "history traversal complete"
        );
        Ok(HistoryResult {
            registry: ctx.registry,
            links: ctx.links,
        })
    }

    /// Resolve one tracked filename referenced by one input parameter:
    /// link matching ancestor outputs, queue unvisited ancestors, and fall
    /// back to a boundary link when nothing but the process itself
    /// produced the value.
    fn resolve_tracked_input(
        &self,
        proc_id: &str,
        input_param: &str,
        referenced: &str,
        cutoff: Option<DateTime<Utc>>,
        ctx: &mut TraversalContext,
        worklist: &mut VecDeque<String>,
    ) -> LineageResult<()> {
        let ancestors = direct_ancestors(
            referenced,
            self.project,
            ctx,
            cutoff,
            Collapse::LatestOnly,
            Some(proc_id),
        )?;

        let mut found_external = false;
        for ancestor_id in &ancestors {
            if ancestor_id == proc_id {
                // Self-referential / in-place modification: not an
                // external ancestor for this parameter.
                continue;
            }
            found_external = true;
            if !ctx.visited.contains(ancestor_id) {
                worklist.push_back(ancestor_id.clone());
            }

            let Some(ancestor) = ctx.get(ancestor_id) else {
                continue;
            };
            let matching: Vec<String> = ancestor
                .brick
                .outputs
                .iter()
                .filter(|(_, value)| value_contains_text(value, referenced))
                .map(|(param, _)| param.clone())
                .collect();
            for output_param in matching {
                ctx.links.insert(Link {
                    src: Some(ancestor_id.clone()),
                    src_param: output_param,
                    dst: Some(proc_id.to_string()),
                    dst_param: input_param.to_string(),
                });
            }
        }

        if !found_external {
            // The value flows in from outside the reconstructed history.
            ctx.links.insert(Link::from_boundary(input_param, proc_id));
        }
        Ok(())
    }
}

/// Outer collapse of the seed set to the most recent completion time;
/// strictly earlier seeds were superseded at the queried file.
fn collapse_seeds(ctx: &TraversalContext, candidates: Vec<String>) -> Vec<String> {
    let Some(max_time) = candidates.iter().filter_map(|id| ctx.exec_time(id)).max() else {
        return candidates;
    };
    let mut seeds = Vec::new();
    for id in candidates {
        if ctx.exec_time(&id) == Some(max_time) {
            seeds.push(id);
        } else {
            info!(process = %id, "dropping superseded history seed");
        }
    }
    seeds
}
