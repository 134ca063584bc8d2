use medcat_types::{Column, ColumnError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("missing columns: {}", join_columns(.0))]
    MissingColumns(Vec<Column>),
    #[error("unknown column: {0}")]
    MissingColumn(String),
    #[error("failed to parse import source: {0}")]
    ImportParse(Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to read file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write catalog file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize catalog: {0}")]
    Serialization(csv::Error),
}

impl CatalogError {
    /// Whether the failure is a user-facing warning that left all state untouched.
    ///
    /// Presentation layers show recoverable failures as warnings and keep going; everything else
    /// is an integration or persistence fault for that operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CatalogError::Validation(_)
                | CatalogError::MissingColumns(_)
                | CatalogError::ImportParse(_)
        )
    }
}

impl From<ColumnError> for CatalogError {
    fn from(err: ColumnError) -> Self {
        match err {
            ColumnError::Unknown(name) => CatalogError::MissingColumn(name),
        }
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
