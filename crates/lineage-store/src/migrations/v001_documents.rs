//! v001: the documents table.

use rusqlite::Connection;

use lineage_core::errors::LineageResult;

use crate::to_store_err;

pub fn migrate(conn: &Connection) -> LineageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS documents (
            collection  TEXT NOT NULL,
            key         TEXT NOT NULL,
            fields      TEXT NOT NULL,
            PRIMARY KEY (collection, key)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
        ",
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}
