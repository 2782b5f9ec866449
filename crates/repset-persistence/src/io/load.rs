//! Document loading operations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::{CURRENT_SCHEMA_VERSION, Document, run_blocking};
use crate::error::{PersistenceError, Result};

/// Read a collection from a JSON store document.
///
/// A missing file is an empty collection.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no store document yet");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(PersistenceError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    parse_document_bytes(&bytes, path)
}

/// Read a document on the blocking thread pool.
pub async fn read_document_async<T>(path: PathBuf) -> Result<Vec<T>>
where
    T: DeserializeOwned + Send + 'static,
{
    run_blocking("read", path, read_document::<T>).await
}

/// Parse document bytes and validate the envelope.
fn parse_document_bytes<T: DeserializeOwned>(bytes: &[u8], path: &Path) -> Result<Vec<T>> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let version = value
        .get("schemaVersion")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: "missing schemaVersion".to_string(),
        })?;

    if version > u64::from(CURRENT_SCHEMA_VERSION) {
        return Err(PersistenceError::UnsupportedVersion {
            found: u32::try_from(version).unwrap_or(u32::MAX),
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let document: Document<Vec<T>> =
        serde_json::from_value(value).map_err(|e| PersistenceError::InvalidFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!(path = %path.display(), count = document.items.len(), "loaded store document");
    Ok(document.items)
}
