//! Shared state of one traversal run.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use lineage_core::{Link, ProtoProcess};

/// Registry, visited-set, and link-set for a single traversal.
///
/// Owned by the traversal run that created it and mutated in place by the
/// resolvers it invokes; never shared between runs. The registry keeps
/// every process ever fetched, including ones later found to belong to
/// superseded branches, so no brick is fetched twice.
#[derive(Debug, Default)]
pub struct TraversalContext {
    pub registry: HashMap<String, ProtoProcess>,
    pub visited: HashSet<String>,
    pub links: HashSet<Link>,
}

impl TraversalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, process: ProtoProcess) {
        self.registry.insert(process.brick.id.clone(), process);
    }

    pub fn get(&self, id: &str) -> Option<&ProtoProcess> {
        self.registry.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.registry.contains_key(id)
    }

    pub fn mark_used(&mut self, id: &str) {
        if let Some(process) = self.registry.get_mut(id) {
            process.used = true;
        }
    }

    /// Completion time of a registered process, when recorded.
    pub fn exec_time(&self, id: &str) -> Option<DateTime<Utc>> {
        self.registry.get(id).and_then(ProtoProcess::exec_time)
    }
}
