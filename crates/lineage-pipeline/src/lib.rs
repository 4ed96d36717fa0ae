//! # lineage-pipeline
//!
//! Converts a reconstructed history into a connected process graph:
//! placeholder nodes for each used process, parameter-to-parameter edges,
//! and boundary parameters exported under collision-free names.

pub mod graph;
pub mod materialize;
pub mod node;

pub use graph::{BoundaryKind, BoundaryParam, ParamEdge, PipelineGraph};
pub use materialize::{data_history_pipeline, pipeline_from_history};
pub use node::PipelineNode;
