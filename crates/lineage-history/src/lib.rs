//! # lineage-history
//!
//! Reconstruction of the minimal, causally-consistent subgraph of
//! processing steps and data dependencies that produced the current
//! version of a tracked file, from the flat append-only provenance log.

pub mod ancestors;
pub mod brick_loader;
pub mod classify;
pub mod context;
pub mod engine;
pub mod scan;

pub use classify::{is_data_entry, TempPolicy};
pub use context::TraversalContext;
pub use engine::{HistoryEngine, HistoryResult};
