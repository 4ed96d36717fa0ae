//! DocumentStore — owns the connection, implements IDocumentStore,
//! runs migrations on startup.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::Connection;

use lineage_core::errors::LineageResult;
use lineage_core::{Document, IDocumentStore, Value};

use crate::migrations;
use crate::to_store_err;

/// The reference document store. The history engine is single-threaded and
/// read-mostly, so a single mutex-guarded connection replaces a pool.
pub struct DocumentStore {
    conn: Mutex<Connection>,
}

impl DocumentStore {
    /// Open a store backed by a file on disk.
    pub fn open(path: &Path) -> LineageResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_store_err(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> LineageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_store_err(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> LineageResult<()> {
        self.with_conn(migrations::run_migrations)
    }

    fn with_conn<F, T>(&self, f: F) -> LineageResult<T>
    where
        F: FnOnce(&Connection) -> LineageResult<T>,
    {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&conn)
    }
}

impl IDocumentStore for DocumentStore {
    fn has_document(&self, collection: &str, key: &str) -> LineageResult<bool> {
        self.with_conn(|conn| crate::queries::document_ops::has_document(conn, collection, key))
    }

    fn get_document(&self, collection: &str, key: &str) -> LineageResult<Option<Document>> {
        self.with_conn(|conn| crate::queries::document_ops::get_document(conn, collection, key))
    }

    fn documents(
        &self,
        collection: &str,
        keys: Option<&[String]>,
        fields: Option<&[&str]>,
    ) -> LineageResult<Vec<Document>> {
        self.with_conn(|conn| {
            crate::queries::document_ops::list_documents(conn, collection, keys, fields)
        })
    }

    fn get_value(
        &self,
        collection: &str,
        key: &str,
        field: &str,
    ) -> LineageResult<Option<Value>> {
        self.with_conn(|conn| crate::queries::document_ops::get_value(conn, collection, key, field))
    }

    fn set_document(&self, collection: &str, key: &str, doc: &Document) -> LineageResult<()> {
        self.with_conn(|conn| crate::queries::document_ops::set_document(conn, collection, key, doc))
    }

    fn set_value(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> LineageResult<()> {
        self.with_conn(|conn| {
            crate::queries::document_ops::set_value(conn, collection, key, field, value)
        })
    }
}
