use std::fs;
use std::path::Path;

use crate::catalog::domain::jewelry_catalog::{CatalogError, JewelryCatalog};

/// Loads a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<JewelryCatalog, CatalogError> {
    let json = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = JewelryCatalog::from_json(&json)?;
    log::info!("Loaded {} jewelry items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Loads `path` when given, otherwise falls back to the built-in catalog.
pub fn load_or_builtin(path: Option<&Path>) -> Result<JewelryCatalog, CatalogError> {
    match path {
        Some(p) => load_catalog(p),
        None => Ok(JewelryCatalog::builtin()),
    }
}
