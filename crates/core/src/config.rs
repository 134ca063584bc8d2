//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. The
//! core never reads environment variables itself; binaries do that and hand the result over.

use crate::constants::DEFAULT_CATALOG_FILE;
use crate::{CatalogError, CatalogResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    catalog_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidInput` if the path is empty or names an existing directory.
    pub fn new(catalog_file: PathBuf) -> CatalogResult<Self> {
        if catalog_file.as_os_str().is_empty() {
            return Err(CatalogError::InvalidInput(
                "catalog file path cannot be empty".into(),
            ));
        }

        if catalog_file.is_dir() {
            return Err(CatalogError::InvalidInput(format!(
                "catalog file path is a directory: {}",
                catalog_file.display()
            )));
        }

        Ok(Self { catalog_file })
    }

    pub fn catalog_file(&self) -> &Path {
        &self.catalog_file
    }
}

/// Resolve the backing file path without reading environment variables.
///
/// Returns `override_file` when given, otherwise [`DEFAULT_CATALOG_FILE`] relative to the
/// current working directory.
pub fn resolve_catalog_file(override_file: Option<PathBuf>) -> PathBuf {
    override_file
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE))
}
