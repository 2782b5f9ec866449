//! Store document I/O.
//!
//! Each collection lives in its own JSON document:
//!
//! ```text
//! {
//!   "schemaVersion": 1,
//!   "items": [ ... ]
//! }
//! ```

mod load;
mod save;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, Result};

pub use load::{read_document, read_document_async};
pub use save::{write_document, write_document_async};

/// Current schema version of store documents.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Document<C> {
    pub schema_version: u32,
    pub items: C,
}

/// Run document I/O on the blocking pool.
///
/// A task that never finishes (panic, runtime shutdown) is reported as an
/// I/O failure on `path`.
pub(crate) async fn run_blocking<R, F>(operation: &'static str, path: PathBuf, work: F) -> Result<R>
where
    F: FnOnce(&Path) -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    let target = path.clone();
    tokio::task::spawn_blocking(move || work(&path))
        .await
        .map_err(|e| PersistenceError::Io {
            operation,
            path: target,
            source: std::io::Error::other(e),
        })?
}
