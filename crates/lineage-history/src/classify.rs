//! Entry classification: is a candidate path a tracked database entry?

use lineage_core::constants::{CURRENT_COLLECTION, TEMP_SENTINEL};
use lineage_core::errors::LineageResult;
use lineage_core::{DataEntry, Project};

/// Whether the temp sentinel is an acceptable classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempPolicy {
    Allow,
    Deny,
}

/// Classify a candidate path.
///
/// The sentinel classifies as `DataEntry::Temp` when allowed. Any other
/// candidate is reduced to its data-root-relative form and looked up as a
/// primary key of the "current" collection; candidates outside the root or
/// unknown to the store are not entries (`None`). No side effects.
pub fn is_data_entry(
    candidate: &str,
    project: &Project,
    temp: TempPolicy,
) -> LineageResult<Option<DataEntry>> {
    if candidate == TEMP_SENTINEL {
        return Ok(match temp {
            TempPolicy::Allow => Some(DataEntry::Temp),
            TempPolicy::Deny => None,
        });
    }

    let Some(relative) = project.relative_data_path(candidate) else {
        return Ok(None);
    };
    if project.store().has_document(CURRENT_COLLECTION, &relative)? {
        Ok(Some(DataEntry::Tracked(relative)))
    } else {
        Ok(None)
    }
}
