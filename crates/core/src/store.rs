//! Backing-file store.
//!
//! The whole catalog lives in one comma-delimited file. [`CatalogStore::load`] reads it in full
//! on every call and [`CatalogStore::save`] rewrites it in full. There is no cache, no temporary
//! file and no rename: a crash during `save` can leave a truncated file behind.
//!
//! Loading never fails. A missing or unreadable file yields an empty table, and the
//! [`LoadOutcome`] says which of the two happened so callers can report it.

use crate::codec::{self, CodecError};
use crate::config::CoreConfig;
use crate::constants::CATALOG_DELIMITER;
use crate::record::Table;
use crate::{CatalogError, CatalogResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Why `load` fell back to an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// The backing file does not exist yet.
    Missing,
    /// The file exists but could not be read or decoded.
    Unreadable(String),
}

/// Result of reading the backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Table),
    Defaulted { table: Table, reason: DefaultReason },
}

impl LoadOutcome {
    pub fn table(&self) -> &Table {
        match self {
            LoadOutcome::Loaded(table) | LoadOutcome::Defaulted { table, .. } => table,
        }
    }

    pub fn into_table(self) -> Table {
        match self {
            LoadOutcome::Loaded(table) | LoadOutcome::Defaulted { table, .. } => table,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, LoadOutcome::Defaulted { .. })
    }
}

/// Reads and writes the catalog backing file.
#[derive(Clone, Debug)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.catalog_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the entire backing file.
    ///
    /// Extra columns are ignored and short rows padded with missing values. A header without all
    /// six canonical columns counts as unreadable.
    pub fn load(&self) -> LoadOutcome {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(
                    "catalog file {} not found, starting empty",
                    self.path.display()
                );
                return LoadOutcome::Defaulted {
                    table: Table::new(),
                    reason: DefaultReason::Missing,
                };
            }
            Err(e) => return self.unreadable(e.to_string()),
        };

        let raw = match codec::read_raw(&bytes, CATALOG_DELIMITER) {
            Ok(raw) => raw,
            Err(CodecError::Empty) => return self.unreadable("file has no header row".into()),
            Err(e) => return self.unreadable(e.to_string()),
        };

        let missing = raw.missing_columns();
        if !missing.is_empty() {
            return self.unreadable(CatalogError::MissingColumns(missing).to_string());
        }

        let table = raw.into_table();
        tracing::debug!(
            "loaded {} rows from {}",
            table.len(),
            self.path.display()
        );
        LoadOutcome::Loaded(table)
    }

    fn unreadable(&self, cause: String) -> LoadOutcome {
        tracing::warn!(
            "catalog file {} is unreadable, starting empty: {}",
            self.path.display(),
            cause
        );
        LoadOutcome::Defaulted {
            table: Table::new(),
            reason: DefaultReason::Unreadable(cause),
        }
    }

    /// Overwrites the backing file with the full table.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::FileWrite` if the file or its parent directory cannot be created,
    /// and `CatalogError::Serialization` if encoding or writing the rows fails.
    pub fn save(&self, table: &Table) -> CatalogResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(CatalogError::FileWrite)?;
            }
        }

        let file = fs::File::create(&self.path).map_err(CatalogError::FileWrite)?;
        codec::write_table(file, table).map_err(CatalogError::Serialization)?;

        tracing::info!("saved {} rows to {}", table.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use tempfile::TempDir;

    const HEADER: &str = "Medicamento,Classe,Indicação,Reações Adversas,Apresentação,Dosagem";

    fn diazepam() -> Record {
        Record {
            medication: "Diazepam".into(),
            class: "Benzodiazepine".into(),
            indication: "Anxiety".into(),
            adverse_reactions: "Drowsiness, Dizziness".into(),
            presentation: "Tablet".into(),
            dosage: "5mg".into(),
        }
    }

    #[test]
    fn test_load_missing_file_defaults_empty() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("catalog.csv"));

        let outcome = store.load();

        assert_eq!(
            outcome,
            LoadOutcome::Defaulted {
                table: Table::new(),
                reason: DefaultReason::Missing
            }
        );
    }

    #[test]
    fn test_load_empty_file_defaults_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.csv");
        fs::write(&path, "").unwrap();

        let outcome = CatalogStore::new(&path).load();

        assert!(outcome.is_defaulted());
        assert!(matches!(
            outcome,
            LoadOutcome::Defaulted {
                reason: DefaultReason::Unreadable(_),
                ..
            }
        ));
        assert!(outcome.table().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_defaults_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.csv");
        fs::write(&path, format!("{HEADER}\na,b,c,d,e,f,g,h\n")).unwrap();

        let outcome = CatalogStore::new(&path).load();

        assert!(outcome.is_defaulted());
        assert!(outcome.into_table().is_empty());
    }

    #[test]
    fn test_load_file_without_canonical_columns_defaults_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.csv");
        fs::write(&path, "Name,Price\nDiazepam,3\n").unwrap();

        let outcome = CatalogStore::new(&path).load();

        match outcome {
            LoadOutcome::Defaulted {
                reason: DefaultReason::Unreadable(cause),
                ..
            } => assert!(cause.contains("Medication")),
            other => panic!("expected defaulted load, got {other:?}"),
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("catalog.csv"));

        let table = Table::from_rows(vec![
            diazepam(),
            Record {
                medication: "Bromazepam".into(),
                indication: "Panic disorder\nand anxiety".into(),
                presentation: "  Tablet  ".into(),
                ..Record::default()
            },
        ]);
        store.save(&table).unwrap();

        assert_eq!(store.load(), LoadOutcome::Loaded(table));
    }

    #[test]
    fn test_save_empty_table_writes_header_only() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("catalog.csv"));

        store.save(&Table::new()).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, format!("{HEADER}\n"));
        assert_eq!(store.load(), LoadOutcome::Loaded(Table::new()));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path().join("data").join("catalog.csv"));

        store.save(&Table::from_rows(vec![diazepam()])).unwrap();

        assert!(store.path().is_file());
    }

    #[test]
    fn test_save_into_directory_fails() {
        let temp = TempDir::new().unwrap();
        let store = CatalogStore::new(temp.path());

        let result = store.save(&Table::new());

        assert!(matches!(result, Err(CatalogError::FileWrite(_))));
    }

    #[test]
    fn test_load_ignores_extra_columns_and_reorders() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catalog.csv");
        fs::write(
            &path,
            "Dosagem,Notes,Medicamento,Classe,Indicação,Reações Adversas,Apresentação\n\
             5mg,keep cold,Diazepam,Benzodiazepine,Anxiety,\"Drowsiness, Dizziness\",Tablet\n",
        )
        .unwrap();

        let outcome = CatalogStore::new(&path).load();

        assert_eq!(outcome, LoadOutcome::Loaded(Table::from_rows(vec![diazepam()])));
    }
}
