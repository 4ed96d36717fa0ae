/// Lineage system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sentinel standing in for an untracked/anonymous intermediate value.
pub const TEMP_SENTINEL: &str = "<temp>";

/// Collection holding one document per tracked filename.
pub const CURRENT_COLLECTION: &str = "current";

/// Collection holding one document per recorded brick.
pub const BRICK_COLLECTION: &str = "brick";

/// Field of a "current" document listing the brick identifiers recorded
/// against the filename, oldest first.
pub const BRICK_HISTORY_FIELD: &str = "bricks";

/// Field under which a document's primary key is exposed when listing
/// a collection.
pub const KEY_FIELD: &str = "_key";

/// Default ceiling on the number of processes one traversal may visit.
pub const DEFAULT_MAX_PROCESSES: usize = 10_000;
