//! Constants used throughout the catalog core crate.

/// Backing file used when no explicit catalog file is configured.
pub const DEFAULT_CATALOG_FILE: &str = "medicamentos_completos_com_bromazepam.csv";

/// Delimiter of the backing file.
pub const CATALOG_DELIMITER: u8 = b',';

/// Delimiters tried, in order of preference, when sniffing an imported file.
pub const SNIFF_CANDIDATES: [u8; 5] = [b',', b';', b'\t', b'|', b':'];

/// Number of leading lines inspected when sniffing a delimiter.
pub const SNIFF_SAMPLE_LINES: usize = 20;

/// Upper bound on the bytes inspected when sniffing a delimiter.
pub const SNIFF_SAMPLE_BYTES: usize = 64 * 1024;

/// Number of entries returned by summaries when the caller gives no limit.
pub const DEFAULT_SUMMARY_LIMIT: usize = 10;

/// Separator between individual reactions inside the Adverse Reactions column.
pub const REACTION_SEPARATOR: char = ',';

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
