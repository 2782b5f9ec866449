//! Document saving operations.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{CURRENT_SCHEMA_VERSION, Document, run_blocking};
use crate::error::{PersistenceError, Result};

/// Write a collection to a JSON store document.
///
/// Uses atomic write (temp file + rename) so a crash never leaves a
/// half-written document behind.
pub fn write_document<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let document = Document {
        schema_version: CURRENT_SCHEMA_VERSION,
        items,
    };
    let bytes = serde_json::to_vec_pretty(&document).map_err(|e| {
        PersistenceError::Serialization {
            source: Box::new(e),
        }
    })?;

    let temp_path = path.with_extension("json.tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(&bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })?;

    tracing::debug!(path = %path.display(), count = items.len(), "wrote store document");
    Ok(())
}

/// Write a document on the blocking thread pool.
pub async fn write_document_async<T>(path: PathBuf, items: Vec<T>) -> Result<()>
where
    T: Serialize + Send + 'static,
{
    run_blocking("write", path, move |path| write_document(path, &items)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_document_creates_parent_and_envelope() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("routines.json");

        write_document(&path, &["a", "b"][..]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schemaVersion"], CURRENT_SCHEMA_VERSION);
        assert_eq!(value["items"][1], "b");
        assert!(!path.with_extension("json.tmp").exists());
    }
}
