//! # lineage-store
//!
//! SQLite-backed reference implementation of the `IDocumentStore` contract.
//! One table holds every document as a JSON blob keyed by (collection, key).

pub mod engine;
pub mod migrations;
pub mod queries;

pub use engine::DocumentStore;

use lineage_core::errors::{LineageError, StoreError};

/// Map a low-level SQLite failure into the workspace error type.
pub(crate) fn to_store_err(message: String) -> LineageError {
    LineageError::Store(StoreError::Sqlite { message })
}

/// Map a JSON (de)serialization failure into the workspace error type.
pub(crate) fn to_serde_err(message: String) -> LineageError {
    LineageError::Store(StoreError::Serialization { message })
}
