//! Placeholder process nodes.

use lineage_core::{Brick, Value};

/// A read-only representation of one recorded process: its parameter names
/// and recorded values, in recorded order. It cannot execute.
#[derive(Debug, Clone)]
pub struct PipelineNode {
    /// Display name within the graph (short process name, possibly
    /// suffixed for uniqueness).
    pub name: String,
    /// Identifier of the underlying brick.
    pub process_id: String,
    pub inputs: Vec<(String, Value)>,
    pub outputs: Vec<(String, Value)>,
}

impl PipelineNode {
    pub fn from_brick(brick: &Brick, name: String) -> Self {
        Self {
            name,
            process_id: brick.id.clone(),
            inputs: brick
                .inputs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            outputs: brick
                .outputs
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn has_input(&self, param: &str) -> bool {
        self.inputs.iter().any(|(name, _)| name == param)
    }

    pub fn has_output(&self, param: &str) -> bool {
        self.outputs.iter().any(|(name, _)| name == param)
    }
}
