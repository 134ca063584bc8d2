//! Adding medications.

use crate::record::{Record, Table};
use crate::store::CatalogStore;
use crate::{CatalogError, CatalogResult};

/// Appends `record` to `table` and persists the result.
///
/// Only the medication name is validated, and only for emptiness: a name of spaces is kept as is.
/// Duplicates are allowed. The record is stored exactly as given. `table` is replaced only after the save succeeds, so on any error both the
/// in-memory table and the backing file are left as they were.
///
/// # Errors
///
/// - `CatalogError::Validation` if the medication name is empty.
/// - `CatalogError::FileWrite` / `CatalogError::Serialization` if saving fails.
pub fn add_medication(store: &CatalogStore, table: &mut Table, record: Record) -> CatalogResult<()> {
    if record.medication.is_empty() {
        tracing::warn!("rejected medication without a name");
        return Err(CatalogError::Validation(
            "medication name is required".into(),
        ));
    }

    let mut next = table.clone();
    next.push(record);
    store.save(&next)?;

    *table = next;
    Ok(())
}
