//! Bulk import of externally supplied delimited files.
//!
//! An import runs in two steps. [`ExternalTable::parse`] decodes the upload with an auto-detected
//! delimiter. [`import_merge`] then checks the header against the canonical columns, normalises the
//! rows to those columns, appends them, drops exact duplicates and persists.
//!
//! Duplicates are compared after normalisation, so extra or reordered columns in the source do not
//! affect which rows count as equal.

use crate::codec::{self, RawTable};
use crate::record::Table;
use crate::store::CatalogStore;
use crate::{CatalogError, CatalogResult};
use medcat_types::Column;
use std::fs;
use std::path::Path;

/// A parsed import source, still carrying its own header.
#[derive(Debug, Clone)]
pub struct ExternalTable {
    delimiter: u8,
    raw: RawTable,
}

impl ExternalTable {
    /// Decodes raw upload bytes, sniffing the delimiter.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ImportParse` for an empty source, invalid UTF-8, malformed rows or a
    /// row with more fields than the header.
    pub fn parse(bytes: &[u8]) -> CatalogResult<Self> {
        let delimiter = codec::sniff_delimiter(bytes);
        let raw = codec::read_raw(bytes, delimiter).map_err(|e| {
            tracing::warn!("import source could not be parsed: {}", e);
            CatalogError::ImportParse(Box::new(e))
        })?;

        Ok(Self { delimiter, raw })
    }

    /// Delimiter detected in the source.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Header cells exactly as they appeared in the source.
    pub fn headers(&self) -> &[String] {
        self.raw.headers()
    }

    pub fn row_count(&self) -> usize {
        self.raw.row_count()
    }

    /// Canonical columns the source lacks, in canonical order.
    pub fn missing_columns(&self) -> Vec<Column> {
        self.raw.missing_columns()
    }
}

/// What an import changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub delimiter: u8,
    /// Rows read from the source.
    pub rows_read: usize,
    /// Net growth of the table.
    pub rows_added: usize,
    /// Rows removed as exact duplicates after the merge.
    pub duplicates_dropped: usize,
    pub total_rows: usize,
}

/// Merges `external` into `table`, drops duplicate rows and persists.
///
/// `table` is replaced only once the merged table is saved; on any error it is left unchanged.
///
/// # Errors
///
/// - `CatalogError::MissingColumns` naming every canonical column the source lacks.
/// - `CatalogError::FileWrite` / `CatalogError::Serialization` if saving fails.
pub fn import_merge(
    store: &CatalogStore,
    table: &mut Table,
    external: ExternalTable,
) -> CatalogResult<ImportSummary> {
    let missing = external.missing_columns();
    if !missing.is_empty() {
        tracing::warn!(
            "import rejected, missing columns: {:?}",
            missing.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
        return Err(CatalogError::MissingColumns(missing));
    }

    let delimiter = external.delimiter;
    let incoming = external.raw.into_table();
    let rows_read = incoming.len();

    let mut merged = table.clone();
    merged.extend(incoming.into_rows());
    let duplicates_dropped = merged.dedup_rows();

    store.save(&merged)?;

    let summary = ImportSummary {
        delimiter,
        rows_read,
        rows_added: merged.len().saturating_sub(table.len()),
        duplicates_dropped,
        total_rows: merged.len(),
    };
    *table = merged;

    tracing::info!(
        "imported {} rows ({} new, {} duplicates dropped)",
        summary.rows_read,
        summary.rows_added,
        summary.duplicates_dropped
    );
    Ok(summary)
}

/// Parses `bytes` and merges them into `table`.
pub fn import_bytes(
    store: &CatalogStore,
    table: &mut Table,
    bytes: &[u8],
) -> CatalogResult<ImportSummary> {
    let external = ExternalTable::parse(bytes)?;
    import_merge(store, table, external)
}

/// Reads the file at `path` and merges it into `table`.
///
/// # Errors
///
/// Returns `CatalogError::FileRead` if the file cannot be read, otherwise as [`import_bytes`].
pub fn import_file(
    store: &CatalogStore,
    table: &mut Table,
    path: &Path,
) -> CatalogResult<ImportSummary> {
    let bytes = fs::read(path).map_err(CatalogError::FileRead)?;
    import_bytes(store, table, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::store::LoadOutcome;
    use tempfile::TempDir;

    const HEADER: &str = "Medicamento,Classe,Indicação,Reações Adversas,Apresentação,Dosagem";

    fn record(name: &str, class: &str, reactions: &str) -> Record {
        Record {
            medication: name.into(),
            class: class.into(),
            indication: "Anxiety".into(),
            adverse_reactions: reactions.into(),
            presentation: "Tablet".into(),
            dosage: "5mg".into(),
        }
    }

    fn existing() -> Table {
        Table::from_rows(vec![
            record("Diazepam", "Benzodiazepine", "Drowsiness, Dizziness"),
            record("Bromazepam", "Benzodiazepine", "Sedation"),
        ])
    }

    fn as_csv(table: &Table) -> String {
        let mut out = format!("{HEADER}\n");
        for r in table {
            out.push_str(&format!(
                "{},{},{},\"{}\",{},{}\n",
                r.medication, r.class, r.indication, r.adverse_reactions, r.presentation, r.dosage
            ));
        }
        out
    }

    fn store_in(temp: &TempDir) -> CatalogStore {
        CatalogStore::new(temp.path().join("catalog.csv"))
    }

    #[test]
    fn test_missing_dosage_is_rejected_and_nothing_changes() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();
        let data = "Medicamento,Classe,Indicação,Reações Adversas,Apresentação\n\
                    Lorazepam,Benzodiazepine,Anxiety,Sedation,Tablet\n";

        let result = import_bytes(&store, &mut table, data.as_bytes());

        match result {
            Err(CatalogError::MissingColumns(missing)) => {
                assert_eq!(missing, vec![Column::Dosage]);
            }
            other => panic!("expected missing columns, got {other:?}"),
        }
        assert_eq!(table, existing());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_full_overlap_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();

        let summary = import_bytes(&store, &mut table, as_csv(&existing()).as_bytes()).unwrap();

        assert_eq!(table, existing());
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.rows_added, 0);
        assert_eq!(summary.duplicates_dropped, 2);
        assert_eq!(store.load(), LoadOutcome::Loaded(existing()));
    }

    #[test]
    fn test_merge_appends_after_existing_rows() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();
        let incoming = Table::from_rows(vec![
            record("Lorazepam", "Benzodiazepine", "Sedation"),
            record("Diazepam", "Benzodiazepine", "Drowsiness, Dizziness"),
            record("Sertraline", "SSRI", "Nausea, Headache"),
        ]);

        let summary = import_bytes(&store, &mut table, as_csv(&incoming).as_bytes()).unwrap();

        let names: Vec<&str> = table.iter().map(|r| r.medication.as_str()).collect();
        assert_eq!(names, vec!["Diazepam", "Bromazepam", "Lorazepam", "Sertraline"]);
        assert_eq!(summary.rows_added, 2);
        assert_eq!(summary.duplicates_dropped, 1);
        assert_eq!(summary.total_rows, 4);
        assert_eq!(store.load().into_table(), table);
    }

    #[test]
    fn test_semicolon_source_with_extra_and_reordered_columns() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();
        let data = "Dosagem;Lote;Medicamento;Classe;Indicação;Reações Adversas;Apresentação\n\
                    5mg;A1;Diazepam;Benzodiazepine;Anxiety;Drowsiness, Dizziness;Tablet\n\
                    1mg;B2;Clonazepam;Benzodiazepine;Anxiety;Sedation, Fatigue;Tablet\n";

        let summary = import_bytes(&store, &mut table, data.as_bytes()).unwrap();

        assert_eq!(summary.delimiter, b';');
        assert_eq!(summary.rows_added, 1);
        assert_eq!(table.len(), 3);
        let added = &table.rows()[2];
        assert_eq!(added.medication, "Clonazepam");
        assert_eq!(added.dosage, "1mg");
        assert_eq!(added.adverse_reactions, "Sedation, Fatigue");
    }

    #[test]
    fn test_merge_collapses_existing_duplicates() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let dup = record("Diazepam", "Benzodiazepine", "Drowsiness");
        let mut table = Table::from_rows(vec![dup.clone(), dup.clone()]);

        let summary = import_bytes(&store, &mut table, format!("{HEADER}\n").as_bytes()).unwrap();

        assert_eq!(table.rows(), &[dup]);
        assert_eq!(summary.duplicates_dropped, 1);
        assert_eq!(summary.rows_added, 0);
    }

    #[test]
    fn test_parse_failure_carries_cause() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"\xff\xfe,,,,,\n");

        let err = import_bytes(&store, &mut table, &data).unwrap_err();

        assert!(matches!(err, CatalogError::ImportParse(_)));
        assert!(err.is_recoverable());
        assert!(err.to_string().starts_with("failed to parse import source"));
        assert_eq!(table, existing());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_empty_source_is_a_parse_failure() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();

        let err = import_bytes(&store, &mut table, b"").unwrap_err();

        assert!(matches!(err, CatalogError::ImportParse(_)));
    }

    #[test]
    fn test_import_file_reports_unreadable_path() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        let mut table = existing();

        let err = import_file(&store, &mut table, &temp.path().join("nope.csv")).unwrap_err();

        assert!(matches!(err, CatalogError::FileRead(_)));
    }

    #[test]
    fn test_external_table_reports_headers_and_missing_columns() {
        let external = ExternalTable::parse(b"Medication\tClass\nDiazepam\tBenzo\n").unwrap();

        assert_eq!(external.delimiter(), b'\t');
        assert_eq!(external.headers(), &["Medication".to_string(), "Class".to_string()]);
        assert_eq!(external.row_count(), 1);
        assert_eq!(
            external.missing_columns(),
            vec![
                Column::Indication,
                Column::AdverseReactions,
                Column::Presentation,
                Column::Dosage
            ]
        );
    }
}
