use indexmap::IndexMap;

use crate::errors::LineageResult;
use crate::value::Value;

/// One stored document: an insertion-ordered field map.
pub type Document = IndexMap<String, Value>;

/// Narrow document-store contract consumed by the history engine.
///
/// Collections are logical names ("current", "brick"); keys are primary key
/// strings. Absence is never an error: a missing collection reads as empty,
/// a missing document or field as `None`. The reconstruction core only
/// reads; the write operations exist for the surrounding system (and the
/// test fixtures) that record provenance.
pub trait IDocumentStore: Send + Sync {
    fn has_document(&self, collection: &str, key: &str) -> LineageResult<bool>;

    fn get_document(&self, collection: &str, key: &str) -> LineageResult<Option<Document>>;

    /// List a collection's documents, optionally restricted to `keys` and
    /// projected to `fields`. Each returned document carries its primary
    /// key under the `"_key"` field.
    fn documents(
        &self,
        collection: &str,
        keys: Option<&[String]>,
        fields: Option<&[&str]>,
    ) -> LineageResult<Vec<Document>>;

    /// Read one field of one document.
    fn get_value(&self, collection: &str, key: &str, field: &str)
        -> LineageResult<Option<Value>>;

    fn set_document(&self, collection: &str, key: &str, doc: &Document) -> LineageResult<()>;

    /// Write one field of one document, creating the document if absent.
    fn set_value(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> LineageResult<()>;
}
