//! Static candidate catalog.
//!
//! The catalog is the synchronous half of the candidate pool: every field
//! type that is not async-only is searched here. It is loaded once from a
//! JSON array of `{"id", "label", "type"}` objects, or taken from the
//! embedded default.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::types::DataItem;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not a JSON array of items: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog id {0:?}")]
    DuplicateId(String),
}

/// Immutable, cheaply cloneable list of catalog items in display order.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<[DataItem]>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(items: Vec<DataItem>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self {
            items: items.into(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<DataItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// The embedded flag and RFMO catalog.
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_CATALOG).expect("built-in catalog must be valid")
    }

    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct field types in first-seen order.
    pub fn field_types(&self) -> Vec<String> {
        let mut types: Vec<String> = Vec::new();
        for item in self.items.iter() {
            if !types.contains(&item.field_type) {
                types.push(item.field_type.clone());
            }
        }
        types
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
