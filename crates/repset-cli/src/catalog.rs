//! Exercise catalog loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use repset_core::StaticCatalog;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// The catalog shipped with the binary.
pub fn builtin_catalog() -> Result<StaticCatalog> {
    StaticCatalog::from_json(BUILTIN_CATALOG).context("parse built-in exercise catalog")
}

/// Catalog from `path`, or the built-in one.
pub fn load_catalog(path: Option<&Path>) -> Result<StaticCatalog> {
    let Some(path) = path else {
        return builtin_catalog();
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("read catalog {}", path.display()))?;
    let catalog = StaticCatalog::from_json(&content)
        .with_context(|| format!("parse catalog {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = catalog.len(), "loaded exercise catalog");
    Ok(catalog)
}
