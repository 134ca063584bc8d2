//! Request and response bodies of the REST API.

use medcat_core::{Frequency, ImportSummary, Record};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// One medication as exchanged over the API. Missing fields default to empty text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct MedicationDto {
    pub medication: String,
    pub class: String,
    pub indication: String,
    pub adverse_reactions: String,
    pub presentation: String,
    pub dosage: String,
}

impl From<&Record> for MedicationDto {
    fn from(record: &Record) -> Self {
        Self {
            medication: record.medication.clone(),
            class: record.class.clone(),
            indication: record.indication.clone(),
            adverse_reactions: record.adverse_reactions.clone(),
            presentation: record.presentation.clone(),
            dosage: record.dosage.clone(),
        }
    }
}

impl From<MedicationDto> for Record {
    fn from(dto: MedicationDto) -> Self {
        Record {
            medication: dto.medication,
            class: dto.class,
            indication: dto.indication,
            adverse_reactions: dto.adverse_reactions,
            presentation: dto.presentation,
            dosage: dto.dosage,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListMedicationsRes {
    pub medications: Vec<MedicationDto>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Column to search, by file header (`Classe`) or English name (`Class`)
    pub column: String,
    /// Case-insensitive substring; empty or absent matches nothing
    pub term: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchRes {
    pub column: String,
    pub term: String,
    pub medications: Vec<MedicationDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AddMedicationRes {
    pub medication: MedicationDto,
    pub total_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportRes {
    pub delimiter: String,
    pub rows_read: usize,
    pub rows_added: usize,
    pub duplicates_dropped: usize,
    pub total_rows: usize,
}

impl From<ImportSummary> for ImportRes {
    fn from(summary: ImportSummary) -> Self {
        Self {
            delimiter: char::from(summary.delimiter).to_string(),
            rows_read: summary.rows_read,
            rows_added: summary.rows_added,
            duplicates_dropped: summary.duplicates_dropped,
            total_rows: summary.total_rows,
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitParams {
    /// Maximum number of entries (default 10)
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FrequencyDto {
    pub label: String,
    pub count: usize,
}

impl From<Frequency> for FrequencyDto {
    fn from(f: Frequency) -> Self {
        Self {
            label: f.label,
            count: f.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FrequenciesRes {
    pub entries: Vec<FrequencyDto>,
}

/// Error body. `missing_columns` is only filled for rejected imports.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_columns: Vec<String>,
}
