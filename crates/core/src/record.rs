//! Medication records and the in-memory table.
//!
//! A [`Record`] is one row with the six catalog fields as free text; an empty string is a missing
//! value. A [`Table`] is the ordered collection of records. Its column set is fixed by [`Column`],
//! so every table has exactly the canonical columns.

use medcat_types::Column;
use std::collections::HashSet;

/// One medication entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Record {
    pub medication: String,
    pub class: String,
    pub indication: String,
    pub adverse_reactions: String,
    pub presentation: String,
    pub dosage: String,
}

impl Record {
    /// Builds a record from values in canonical column order.
    pub fn from_values(values: [String; 6]) -> Self {
        let [medication, class, indication, adverse_reactions, presentation, dosage] = values;
        Self {
            medication,
            class,
            indication,
            adverse_reactions,
            presentation,
            dosage,
        }
    }

    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::Medication => &self.medication,
            Column::Class => &self.class,
            Column::Indication => &self.indication,
            Column::AdverseReactions => &self.adverse_reactions,
            Column::Presentation => &self.presentation,
            Column::Dosage => &self.dosage,
        }
    }

    pub fn set(&mut self, column: Column, value: impl Into<String>) {
        let value = value.into();
        match column {
            Column::Medication => self.medication = value,
            Column::Class => self.class = value,
            Column::Indication => self.indication = value,
            Column::AdverseReactions => self.adverse_reactions = value,
            Column::Presentation => self.presentation = value,
            Column::Dosage => self.dosage = value,
        }
    }

    /// Field values in canonical column order.
    pub fn values(&self) -> [&str; 6] {
        Column::ALL.map(|column| self.get(column))
    }
}

/// Ordered set of records; order is insertion order into the backing file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    /// An empty table with the canonical columns.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [Column; 6] {
        &Column::ALL
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.rows.iter()
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = Record>) {
        self.rows.extend(records);
    }

    /// Removes rows equal across every column to an earlier row, keeping the first occurrence.
    ///
    /// Returns the number of rows removed.
    pub(crate) fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain(|record| seen.insert(record.clone()));
        before - self.rows.len()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
