//! # Medcat Core
//!
//! Core data operations for the medication catalog.
//!
//! This crate contains pure data operations over one delimited-text backing file:
//! - [`store`]: load and save the whole table
//! - [`query`]: case-insensitive substring search over one column
//! - [`mutator`]: validated append of a single record
//! - [`importer`]: merge of an uploaded file with delimiter detection and de-duplication
//! - [`summary`]: reaction and class frequencies
//!
//! **No presentation concerns**: HTTP handlers, CLI parsing and rendering belong in `api-rest`
//! and `medcat-cli`. The in-memory [`Table`] is owned by the caller and passed into every
//! operation; nothing here keeps a process-wide dataset.

mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod importer;
pub mod mutator;
pub mod query;
pub mod record;
pub mod store;
pub mod summary;

pub use codec::{sniff_delimiter, CodecError};
pub use config::CoreConfig;
pub use constants::{DEFAULT_CATALOG_FILE, DEFAULT_SUMMARY_LIMIT};
pub use error::{CatalogError, CatalogResult};
pub use importer::{ExternalTable, ImportSummary};
pub use medcat_types::Column;
pub use record::{Record, Table};
pub use store::{CatalogStore, DefaultReason, LoadOutcome};
pub use summary::Frequency;

use std::path::Path;
use std::sync::Arc;

/// Catalog operations bound to one backing file.
///
/// Holds configuration and the store only. The table is always passed in by the caller.
#[derive(Clone, Debug)]
pub struct CatalogService {
    cfg: Arc<CoreConfig>,
    store: CatalogStore,
}

impl CatalogService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = CatalogStore::from_config(&cfg);
        Self { cfg, store }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Reads the backing file; see [`CatalogStore::load`].
    pub fn load(&self) -> LoadOutcome {
        self.store.load()
    }

    /// See [`query::search`].
    pub fn search(&self, table: &Table, column_name: &str, term: &str) -> CatalogResult<Table> {
        query::search(table, column_name, term)
    }

    /// See [`mutator::add_medication`].
    pub fn add(&self, table: &mut Table, record: Record) -> CatalogResult<()> {
        mutator::add_medication(&self.store, table, record)
    }

    /// See [`importer::import_bytes`].
    pub fn import_bytes(&self, table: &mut Table, bytes: &[u8]) -> CatalogResult<ImportSummary> {
        importer::import_bytes(&self.store, table, bytes)
    }

    /// See [`importer::import_file`].
    pub fn import_file(&self, table: &mut Table, path: &Path) -> CatalogResult<ImportSummary> {
        importer::import_file(&self.store, table, path)
    }

    pub fn reaction_frequencies(&self, table: &Table, limit: usize) -> Vec<Frequency> {
        summary::reaction_frequencies(table, limit)
    }

    pub fn class_counts(&self, table: &Table, limit: usize) -> Vec<Frequency> {
        summary::class_counts(table, limit)
    }
}
