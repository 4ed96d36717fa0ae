//! The materialized process graph: a stable digraph of placeholder nodes
//! with an identifier index and an ordered boundary-parameter table.

use std::collections::HashMap;

use indexmap::IndexMap;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use lineage_core::errors::PipelineError;
use lineage_core::LineageResult;

use crate::node::PipelineNode;

/// Edge payload: which output feeds which input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamEdge {
    pub src_param: String,
    pub dst_param: String,
}

/// Directionality of an exported boundary parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Input,
    Output,
}

/// One exported boundary slot and the process parameters behind it.
#[derive(Debug, Clone)]
pub struct BoundaryParam {
    pub kind: BoundaryKind,
    /// (process identifier, parameter name) endpoints sharing this slot.
    pub endpoints: Vec<(String, String)>,
}

/// Process graph with node lookup by brick identifier.
pub struct PipelineGraph {
    pub graph: StableDiGraph<PipelineNode, ParamEdge>,
    index: HashMap<String, NodeIndex>,
    boundary: IndexMap<String, BoundaryParam>,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
            boundary: IndexMap::new(),
        }
    }

    pub fn add_node(&mut self, node: PipelineNode) -> LineageResult<NodeIndex> {
        if self.index.contains_key(&node.process_id) {
            return Err(PipelineError::DuplicateNode {
                id: node.process_id,
            }
            .into());
        }
        let id = node.process_id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        Ok(idx)
    }

    pub fn node_index(&self, process_id: &str) -> Option<NodeIndex> {
        self.index.get(process_id).copied()
    }

    pub fn node(&self, process_id: &str) -> Option<&PipelineNode> {
        self.node_index(process_id)
            .and_then(|idx| self.graph.node_weight(idx))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &PipelineNode> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connect `src_id.src_param` to `dst_id.dst_param`, validating that
    /// both endpoints exist in the placeholder model.
    pub fn connect(
        &mut self,
        src_id: &str,
        src_param: &str,
        dst_id: &str,
        dst_param: &str,
    ) -> LineageResult<()> {
        let invalid = |reason: &str| PipelineError::InvalidConnection {
            src: src_id.to_string(),
            src_param: src_param.to_string(),
            dst: dst_id.to_string(),
            dst_param: dst_param.to_string(),
            reason: reason.to_string(),
        };

        let src = self.node_index(src_id).ok_or_else(|| invalid("unknown source node"))?;
        let dst = self
            .node_index(dst_id)
            .ok_or_else(|| invalid("unknown destination node"))?;
        if !self.graph[src].has_output(src_param) {
            return Err(invalid("source has no such output parameter").into());
        }
        if !self.graph[dst].has_input(dst_param) {
            return Err(invalid("destination has no such input parameter").into());
        }

        self.graph.add_edge(
            src,
            dst,
            ParamEdge {
                src_param: src_param.to_string(),
                dst_param: dst_param.to_string(),
            },
        );
        Ok(())
    }

    /// Export a process parameter to the graph boundary under `preferred`,
    /// or the first directionally-compatible suffixed alternative.
    /// Returns the chosen slot name.
    pub fn export_boundary(
        &mut self,
        preferred: &str,
        kind: BoundaryKind,
        process_id: &str,
        param: &str,
    ) -> String {
        let endpoint = (process_id.to_string(), param.to_string());

        if self.claim_slot(preferred, kind, &endpoint) {
            return preferred.to_string();
        }

        // Name taken with incompatible directionality: probe suffixes,
        // reusing the first same-direction slot encountered.
        let mut suffix = 0usize;
        loop {
            let candidate = format!("{preferred}_{suffix}");
            if self.claim_slot(&candidate, kind, &endpoint) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Attach `endpoint` to `name` if the slot is free or already has the
    /// same direction. Returns false on a directionality conflict.
    fn claim_slot(&mut self, name: &str, kind: BoundaryKind, endpoint: &(String, String)) -> bool {
        if !self.boundary.contains_key(name) {
            self.boundary.insert(
                name.to_string(),
                BoundaryParam {
                    kind,
                    endpoints: vec![endpoint.clone()],
                },
            );
            return true;
        }
        if let Some(slot) = self.boundary.get_mut(name) {
            if slot.kind == kind {
                slot.endpoints.push(endpoint.clone());
                return true;
            }
        }
        false
    }

    /// Exported boundary slots, in export order.
    pub fn boundary(&self) -> &IndexMap<String, BoundaryParam> {
        &self.boundary
    }
}

impl Default for PipelineGraph {
    fn default() -> Self {
        Self::new()
    }
}
