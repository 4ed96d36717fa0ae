//! Versioned schema migrations, applied in order on startup.

mod v001_documents;

use rusqlite::Connection;

use lineage_core::errors::{LineageError, LineageResult, StoreError};

use crate::to_store_err;

/// Ordered list of migrations; index + 1 is the schema version.
const MIGRATIONS: &[fn(&Connection) -> LineageResult<()>] = &[v001_documents::migrate];

/// Apply every migration newer than the database's current `user_version`.
pub fn run_migrations(conn: &Connection) -> LineageResult<()> {
    let current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| to_store_err(e.to_string()))?;

    for (index, migrate) in MIGRATIONS.iter().enumerate() {
        let version = index as u32 + 1;
        if version <= current {
            continue;
        }
        migrate(conn).map_err(|e| {
            LineageError::Store(StoreError::MigrationFailed {
                version,
                reason: e.to_string(),
            })
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_store_err(e.to_string()))?;
    }
    Ok(())
}
