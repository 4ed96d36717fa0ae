//! Value scanning: extract every tracked filename referenced inside an
//! arbitrarily nested parameter value.

use std::collections::VecDeque;

use indexmap::IndexSet;

use lineage_core::errors::LineageResult;
use lineage_core::{DataEntry, Project, Value};

use crate::classify::{is_data_entry, TempPolicy};

/// Breadth-first worklist over the value tree. Text leaves are classified
/// through `is_data_entry`; sequences expand element-wise, mappings by
/// values only (keys are parameter structure, not data). Other leaves are
/// static parameters and are dropped. The values are plain nested
/// literals, so no cycle protection is needed.
pub fn filenames_in_value(
    value: &Value,
    project: &Project,
    temp: TempPolicy,
) -> LineageResult<IndexSet<DataEntry>> {
    let mut found = IndexSet::new();
    let mut queue: VecDeque<&Value> = VecDeque::new();
    queue.push_back(value);

    while let Some(current) = queue.pop_front() {
        match current {
            Value::Text(candidate) => {
                if let Some(entry) = is_data_entry(candidate, project, temp)? {
                    found.insert(entry);
                }
            }
            Value::Sequence(items) => queue.extend(items.iter()),
            Value::Mapping(entries) => queue.extend(entries.values()),
            Value::Null | Value::Bool(_) | Value::Number(_) => {}
        }
    }
    Ok(found)
}
