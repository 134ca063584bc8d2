//! Case-insensitive substring search over one column.

use crate::record::Table;
use crate::CatalogResult;
use medcat_types::Column;

/// Searches the column named `column_name` for `term`.
///
/// The column name is checked before the term, so an unknown column is reported even for an
/// empty query.
///
/// # Errors
///
/// Returns `CatalogError::MissingColumn` if `column_name` is not a catalog column.
pub fn search(table: &Table, column_name: &str, term: &str) -> CatalogResult<Table> {
    let column: Column = column_name.parse()?;
    Ok(search_column(table, column, term))
}

/// Rows whose `column` value contains `term`, ignoring case.
///
/// An empty term is "no query" and matches nothing. Missing (empty) values never match.
pub fn search_column(table: &Table, column: Column, term: &str) -> Table {
    if term.is_empty() {
        return Table::new();
    }

    let needle = term.to_lowercase();
    let found: Table = table
        .iter()
        .filter(|record| {
            let value = record.get(column);
            !value.is_empty() && value.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();

    tracing::debug!(
        "search {} for {:?}: {} of {} rows",
        column,
        term,
        found.len(),
        table.len()
    );
    found
}

impl Table {
    /// Method form of [`search_column`].
    pub fn search(&self, column: Column, term: &str) -> Table {
        search_column(self, column, term)
    }
}
