//! Flat, row-oriented export of records.
//!
//! Rows are CSV with minimal quoting and CRLF line endings. The header is the
//! field names of the first record ever written for a form and never changes
//! afterwards. Later records are laid out against that header:
//!
//! - header columns missing from a record get an empty cell;
//! - record fields missing from the header are left out of the row (they are
//!   still in the structured store).
//!
//! Existing rows are never rewritten.

use dynform_core::{DynformError, DynformResult, FieldValue};

use crate::record::Record;

/// Separator used to flatten multi-valued fields into one cell.
pub const MULTI_VALUE_SEPARATOR: &str = "|";

/// Flattens a value into one cell.
pub fn flatten(value: &FieldValue) -> String {
    value.join(MULTI_VALUE_SEPARATOR)
}

/// Returns the header a first record establishes.
pub fn header_for(record: &Record) -> Vec<String> {
    record.field_names().map(String::from).collect()
}

/// Lays `record` out against `header`, one cell per column.
pub fn row_for(form: &str, header: &[String], record: &Record) -> Vec<String> {
    let omitted: Vec<&str> = record
        .field_names()
        .filter(|name| !header.iter().any(|column| column == name))
        .collect();
    if !omitted.is_empty() {
        tracing::warn!(
            form,
            fields = ?omitted,
            "fields not in the tabular header were left out of the export row"
        );
    }

    header
        .iter()
        .map(|column| record.get(column).map(flatten).unwrap_or_default())
        .collect()
}

/// Encodes rows as CSV bytes.
pub fn encode_rows(rows: &[Vec<String>]) -> DynformResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|e| DynformError::Storage(format!("Failed to flush tabular rows: {e}")))
}

/// Decodes CSV bytes into rows (header included).
pub fn decode_rows(bytes: &[u8]) -> DynformResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        rows.push(row.iter().map(String::from).collect());
    }
    Ok(rows)
}

/// Returns the header row of an existing export, or `None` if it has no rows.
pub fn read_header(bytes: &[u8]) -> DynformResult<Option<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let first = reader.records().next().transpose().map_err(csv_error)?;
    Ok(first.map(|row| row.iter().map(String::from).collect()))
}

fn csv_error(e: csv::Error) -> DynformError {
    DynformError::Storage(format!("Tabular store error: {e}"))
}
