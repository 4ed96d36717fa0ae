//! Classification result for candidate data paths.

/// A validated data entry: either the temp sentinel or a filename tracked
/// in the project's "current" collection, in its root-relative form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataEntry {
    /// The anonymous/untracked intermediate value marker.
    Temp,
    /// A tracked filename, relative to the project data root.
    Tracked(String),
}

impl DataEntry {
    pub fn is_temp(&self) -> bool {
        matches!(self, DataEntry::Temp)
    }

    pub fn as_tracked(&self) -> Option<&str> {
        match self {
            DataEntry::Tracked(path) => Some(path),
            DataEntry::Temp => None,
        }
    }
}
