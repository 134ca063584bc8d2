//! Delimited-text encoding of catalog tables.
//!
//! Reading is shared by the backing store and the importer: both go through [`RawTable`], which
//! keeps whatever header the source had so callers can check it against the canonical columns.
//! Writing always emits the canonical header with the backing-file delimiter.

use crate::constants::{
    CATALOG_DELIMITER, SNIFF_CANDIDATES, SNIFF_SAMPLE_BYTES, SNIFF_SAMPLE_LINES, UTF8_BOM,
};
use crate::record::{Record, Table};
use medcat_types::Column;
use std::io::Write;

/// Failures while decoding delimited text.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("no header row found")]
    Empty,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },
}

/// Decoded source with its original header.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    headers: Vec<String>,
    rows: Vec<csv::StringRecord>,
}

impl RawTable {
    pub(crate) fn headers(&self) -> &[String] {
        &self.headers
    }

    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first header cell naming each canonical column.
    fn column_positions(&self) -> [Option<usize>; 6] {
        Column::ALL.map(|column| {
            self.headers
                .iter()
                .position(|header| Column::from_header(header) == Some(column))
        })
    }

    /// Canonical columns absent from the header, in canonical order.
    pub(crate) fn missing_columns(&self) -> Vec<Column> {
        let positions = self.column_positions();
        Column::ALL
            .into_iter()
            .filter(|column| positions[column.index()].is_none())
            .collect()
    }

    /// Projects rows onto the canonical columns.
    ///
    /// Extra columns are dropped. Cells past the end of a short row, or belonging to a column the
    /// header lacks, become missing values; callers check [`Self::missing_columns`] first.
    pub(crate) fn into_table(self) -> Table {
        let positions = self.column_positions();
        self.rows
            .iter()
            .map(|row| {
                Record::from_values(positions.map(|position| {
                    position
                        .and_then(|i| row.get(i))
                        .unwrap_or_default()
                        .to_string()
                }))
            })
            .collect()
    }
}

pub(crate) fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Decodes delimited text with a header row.
///
/// Short rows are accepted; a row with more fields than the header is rejected.
pub(crate) fn read_raw(bytes: &[u8], delimiter: u8) -> Result<RawTable, CodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(strip_bom(bytes));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CodecError::Empty);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(CodecError::RaggedRow {
                line: row.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: row.len(),
            });
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Encodes a table as comma-delimited text with the canonical header.
pub(crate) fn write_table<W: Write>(writer: W, table: &Table) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CATALOG_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    writer.write_record(Column::ALL.map(Column::header))?;
    for record in table {
        writer.write_record(record.values())?;
    }
    writer.flush()?;
    Ok(())
}

/// Guesses the delimiter of an imported file.
///
/// Looks at up to [`SNIFF_SAMPLE_LINES`] non-blank leading lines and counts each candidate outside
/// double quotes. Candidates that appear in the header with the same count on every sampled line
/// win over the rest; within each group the highest header count wins, ties going to the earlier
/// candidate. Falls back to comma when no candidate appears at all.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let bytes = strip_bom(bytes);
    let truncated = bytes.len() > SNIFF_SAMPLE_BYTES;
    let sample = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_SAMPLE_BYTES)]);

    let mut lines: Vec<&str> = sample
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SNIFF_SAMPLE_LINES + 1)
        .collect();
    // The last line of a cut sample is probably partial.
    if truncated && lines.len() > 1 {
        lines.pop();
    }
    lines.truncate(SNIFF_SAMPLE_LINES);

    let Some((header, rest)) = lines.split_first() else {
        return CATALOG_DELIMITER;
    };

    let mut best_consistent: Option<(u8, usize)> = None;
    let mut best_any: Option<(u8, usize)> = None;

    for candidate in SNIFF_CANDIDATES {
        let count = count_unquoted(header, candidate);
        if count == 0 {
            continue;
        }

        if best_any.map_or(true, |(_, best)| count > best) {
            best_any = Some((candidate, count));
        }

        let consistent = rest
            .iter()
            .all(|line| count_unquoted(line, candidate) == count);
        if consistent && best_consistent.map_or(true, |(_, best)| count > best) {
            best_consistent = Some((candidate, count));
        }
    }

    best_consistent
        .or(best_any)
        .map(|(delimiter, _)| delimiter)
        .unwrap_or(CATALOG_DELIMITER)
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let delimiter = char::from(delimiter);
    let mut in_quotes = false;
    let mut count = 0;
    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Medicamento,Classe,Indicação,Reações Adversas,Apresentação,Dosagem";

    #[test]
    fn test_sniff_comma_with_quoted_commas() {
        let data = format!(
            "{HEADER}\nDiazepam,Benzodiazepine,Anxiety,\"Drowsiness, Dizziness\",Tablet,5mg\n"
        );
        assert_eq!(sniff_delimiter(data.as_bytes()), b',');
    }

    #[test]
    fn test_sniff_semicolon_with_decimal_commas() {
        let data = "Medicamento;Classe;Indicação;Reações Adversas;Apresentação;Dosagem\n\
                    Diazepam;Benzo;Anxiety;Drowsiness, Dizziness;Tablet;2,5mg\n\
                    Lorazepam;Benzo;Anxiety;Sedation, Fatigue;Tablet;0,5mg\n";
        assert_eq!(sniff_delimiter(data.as_bytes()), b';');
    }

    #[test]
    fn test_sniff_tab() {
        let data = "Medicamento\tClasse\tDosagem\nDiazepam\tBenzo\t5mg\n";
        assert_eq!(sniff_delimiter(data.as_bytes()), b'\t');
    }

    #[test]
    fn test_sniff_falls_back_to_comma() {
        assert_eq!(sniff_delimiter(b"Medicamento\nDiazepam\n"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn test_read_raw_strips_bom_and_projects_columns() {
        let data = format!(
            "\u{feff}Extra,{HEADER}\nx,Diazepam,Benzodiazepine,Anxiety,\"Drowsiness, Dizziness\",Tablet,5mg\n"
        );
        let raw = read_raw(data.as_bytes(), b',').unwrap();
        assert_eq!(raw.headers()[1], "Medicamento");
        assert!(raw.missing_columns().is_empty());

        let table = raw.into_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].medication, "Diazepam");
        assert_eq!(table.rows()[0].adverse_reactions, "Drowsiness, Dizziness");
        assert_eq!(table.rows()[0].dosage, "5mg");
    }

    #[test]
    fn test_read_raw_pads_short_rows() {
        let data = format!("{HEADER}\nDiazepam,Benzodiazepine\n");
        let table = read_raw(data.as_bytes(), b',').unwrap().into_table();
        assert_eq!(table.rows()[0].class, "Benzodiazepine");
        assert_eq!(table.rows()[0].dosage, "");
    }

    #[test]
    fn test_read_raw_rejects_long_rows() {
        let data = format!("{HEADER}\na,b,c,d,e,f,g\n");
        let err = read_raw(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(
            err,
            CodecError::RaggedRow {
                expected: 6,
                found: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_read_raw_rejects_empty_source() {
        assert!(matches!(read_raw(b"", b','), Err(CodecError::Empty)));
    }

    #[test]
    fn test_read_raw_rejects_invalid_utf8() {
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"Diaz\xffepam,,,,,\n");
        assert!(matches!(read_raw(&data, b','), Err(CodecError::Csv(_))));
    }

    #[test]
    fn test_write_table_quotes_only_when_needed() {
        let table = Table::from_rows(vec![Record {
            medication: "Diazepam".into(),
            adverse_reactions: "Drowsiness, Dizziness".into(),
            ..Record::default()
        }]);

        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!("{HEADER}\nDiazepam,,,\"Drowsiness, Dizziness\",,\n")
        );
    }
}
