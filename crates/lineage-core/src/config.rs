//! Traversal configuration.

use crate::constants::DEFAULT_MAX_PROCESSES;

/// Limits applied to one history traversal.
///
/// A pathological provenance log (many ambiguous ties, deep via-temp
/// fallbacks) is bounded only by the total brick count, so the engine
/// enforces an explicit ceiling instead of relying on the log's shape.
#[derive(Debug, Clone, Copy)]
pub struct TraversalLimits {
    /// Maximum number of processes one traversal may pop from its worklist.
    pub max_processes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self {
            max_processes: DEFAULT_MAX_PROCESSES,
        }
    }
}
