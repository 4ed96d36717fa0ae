//! Project context: the data root plus the document store handle.

use std::path::{Component, Path, PathBuf};

use crate::traits::IDocumentStore;

/// Handle passed to every history operation. Owns the store connection;
/// never caches derived traversal state across calls.
pub struct Project {
    data_root: PathBuf,
    store: Box<dyn IDocumentStore>,
}

impl Project {
    pub fn new(data_root: impl Into<PathBuf>, store: Box<dyn IDocumentStore>) -> Self {
        Self {
            data_root: data_root.into(),
            store,
        }
    }

    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    pub fn store(&self) -> &dyn IDocumentStore {
        self.store.as_ref()
    }

    /// Compute a candidate path's form relative to the data root.
    ///
    /// Absolute candidates must lie under the root; relative candidates are
    /// taken as already root-relative but may not escape it. Returns `None`
    /// when the candidate does not lie under the root.
    pub fn relative_data_path(&self, candidate: &str) -> Option<String> {
        let path = Path::new(candidate);
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.data_root).ok()?
        } else {
            path
        };
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return None;
        }
        Some(relative.to_string_lossy().into_owned())
    }
}
