//! Point reads, listing, and writes on the documents table.

use rusqlite::{params, Connection, OptionalExtension};

use lineage_core::constants::KEY_FIELD;
use lineage_core::{Document, Value};

use lineage_core::errors::LineageResult;

use crate::{to_serde_err, to_store_err};

pub fn has_document(conn: &Connection, collection: &str, key: &str) -> LineageResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1 AND key = ?2",
            params![collection, key],
            |row| row.get(0),
        )
        .map_err(|e| to_store_err(e.to_string()))?;
    Ok(count > 0)
}

pub fn get_document(
    conn: &Connection,
    collection: &str,
    key: &str,
) -> LineageResult<Option<Document>> {
    let fields: Option<String> = conn
        .query_row(
            "SELECT fields FROM documents WHERE collection = ?1 AND key = ?2",
            params![collection, key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_store_err(e.to_string()))?;

    fields
        .map(|blob| parse_fields(collection, key, &blob))
        .transpose()
}

/// List a collection in insertion order, optionally restricted to `keys`
/// and projected to `fields`. The primary key rides along under `_key`.
pub fn list_documents(
    conn: &Connection,
    collection: &str,
    keys: Option<&[String]>,
    fields: Option<&[&str]>,
) -> LineageResult<Vec<Document>> {
    let mut stmt = conn
        .prepare("SELECT key, fields FROM documents WHERE collection = ?1 ORDER BY rowid")
        .map_err(|e| to_store_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_store_err(e.to_string()))?;

    let mut documents = Vec::new();
    for row in rows {
        let (key, blob) = row.map_err(|e| to_store_err(e.to_string()))?;
        if let Some(wanted) = keys {
            if !wanted.iter().any(|k| k == &key) {
                continue;
            }
        }
        let parsed = parse_fields(collection, &key, &blob)?;
        let mut document = Document::new();
        document.insert(KEY_FIELD.to_string(), Value::Text(key));
        match fields {
            Some(projection) => {
                for field in projection {
                    if let Some(value) = parsed.get(*field) {
                        document.insert((*field).to_string(), value.clone());
                    }
                }
            }
            None => document.extend(parsed),
        }
        documents.push(document);
    }
    Ok(documents)
}

pub fn get_value(
    conn: &Connection,
    collection: &str,
    key: &str,
    field: &str,
) -> LineageResult<Option<Value>> {
    Ok(get_document(conn, collection, key)?.and_then(|doc| doc.get(field).cloned()))
}

pub fn set_document(
    conn: &Connection,
    collection: &str,
    key: &str,
    doc: &Document,
) -> LineageResult<()> {
    let blob = serde_json::to_string(doc).map_err(|e| to_serde_err(e.to_string()))?;
    conn.execute(
        "INSERT OR REPLACE INTO documents (collection, key, fields) VALUES (?1, ?2, ?3)",
        params![collection, key, blob],
    )
    .map_err(|e| to_store_err(e.to_string()))?;
    Ok(())
}

/// Read-modify-write of one field; creates the document when absent.
pub fn set_value(
    conn: &Connection,
    collection: &str,
    key: &str,
    field: &str,
    value: &Value,
) -> LineageResult<()> {
    let mut doc = get_document(conn, collection, key)?.unwrap_or_default();
    doc.insert(field.to_string(), value.clone());
    set_document(conn, collection, key, &doc)
}

fn parse_fields(collection: &str, key: &str, blob: &str) -> LineageResult<Document> {
    serde_json::from_str(blob).map_err(|e| {
        tracing::warn!(collection, key, error = %e, "malformed document fields");
        to_serde_err(format!("document {collection}/{key}: {e}"))
    })
}
