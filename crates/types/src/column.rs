//! Catalog columns.
//!
//! Every catalog table has the same six columns. Each column has two labels: the header written
//! to the backing file and the English name used in messages. Parsing accepts either.

use std::fmt;
use std::str::FromStr;

/// Raised when a string does not name one of the catalog columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("unknown column: {0}")]
    Unknown(String),
}

/// One of the six canonical catalog columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Medication,
    Class,
    Indication,
    AdverseReactions,
    Presentation,
    Dosage,
}

impl Column {
    /// All columns in canonical (file) order.
    pub const ALL: [Column; 6] = [
        Column::Medication,
        Column::Class,
        Column::Indication,
        Column::AdverseReactions,
        Column::Presentation,
        Column::Dosage,
    ];

    /// Label used in the backing file header row.
    pub const fn header(self) -> &'static str {
        match self {
            Column::Medication => "Medicamento",
            Column::Class => "Classe",
            Column::Indication => "Indicação",
            Column::AdverseReactions => "Reações Adversas",
            Column::Presentation => "Apresentação",
            Column::Dosage => "Dosagem",
        }
    }

    /// English name of the column.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Medication => "Medication",
            Column::Class => "Class",
            Column::Indication => "Indication",
            Column::AdverseReactions => "Adverse Reactions",
            Column::Presentation => "Presentation",
            Column::Dosage => "Dosage",
        }
    }

    /// Position of the column in canonical order.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Matches a header cell against both labels of every column.
    ///
    /// Surrounding whitespace is ignored and the comparison is case-insensitive.
    pub fn from_header(label: &str) -> Option<Column> {
        let wanted = label.trim().to_lowercase();
        Column::ALL.into_iter().find(|column| {
            column.header().to_lowercase() == wanted || column.name().to_lowercase() == wanted
        })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = ColumnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Column::from_header(s).ok_or_else(|| ColumnError::Unknown(s.to_string()))
    }
}
