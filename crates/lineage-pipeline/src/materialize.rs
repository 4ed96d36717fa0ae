//! History-to-pipeline conversion.

use std::collections::HashSet;

use tracing::warn;

use lineage_core::errors::LineageResult;
use lineage_core::{Link, Project, ProtoProcess};
use lineage_history::{HistoryEngine, HistoryResult};

use crate::graph::{BoundaryKind, PipelineGraph};
use crate::node::PipelineNode;

/// Reconstruct the history of `filename` and materialize it as a process
/// graph. Returns `None` when no used process exists (no history to show).
pub fn data_history_pipeline(
    filename: &str,
    project: &Project,
) -> LineageResult<Option<PipelineGraph>> {
    let history = HistoryEngine::new(project).data_history(filename)?;
    pipeline_from_history(&history)
}

/// Materialize an already-computed traversal result.
pub fn pipeline_from_history(history: &HistoryResult) -> LineageResult<Option<PipelineGraph>> {
    let mut used: Vec<&ProtoProcess> = history.registry.values().filter(|p| p.used).collect();
    if used.is_empty() {
        return Ok(None);
    }
    // Deterministic node order: oldest first, identifier as tie-break.
    used.sort_by(|a, b| {
        a.exec_time()
            .cmp(&b.exec_time())
            .then_with(|| a.brick.id.cmp(&b.brick.id))
    });

    let mut graph = PipelineGraph::new();
    let mut taken_names: HashSet<String> = HashSet::new();
    for process in &used {
        let short = process.brick.short_name();
        let name = if taken_names.contains(short) {
            format!("{short}_{}", process.brick.id)
        } else {
            short.to_string()
        };
        taken_names.insert(name.clone());
        graph.add_node(PipelineNode::from_brick(&process.brick, name))?;
    }

    // Stable link order so boundary slots come out the same every run.
    let mut links: Vec<&Link> = history.links.iter().collect();
    links.sort_by(|a, b| {
        (&a.src, &a.src_param, &a.dst, &a.dst_param)
            .cmp(&(&b.src, &b.src_param, &b.dst, &b.dst_param))
    });

    for link in links {
        match (&link.src, &link.dst) {
            (Some(src), Some(dst)) => {
                if let Err(error) =
                    graph.connect(src, &link.src_param, dst, &link.dst_param)
                {
                    warn!(%error, "skipping invalid pipeline connection");
                }
            }
            (None, Some(dst)) => {
                graph.export_boundary(&link.dst_param, BoundaryKind::Input, dst, &link.dst_param);
            }
            (Some(src), None) => {
                graph.export_boundary(&link.src_param, BoundaryKind::Output, src, &link.src_param);
            }
            (None, None) => {}
        }
    }

    Ok(Some(graph))
}
