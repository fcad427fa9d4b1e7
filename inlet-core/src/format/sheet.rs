//! Spreadsheet parser (XLSX/XLS)

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;

use crate::domain::result::{Error, Result};
use crate::domain::{RawRecord, RawValue};

/// Parse workbook bytes into raw records from the first sheet only
///
/// The first row is the header. Missing cells become empty text rather than
/// being omitted, so every record carries the full header width.
pub(crate) fn parse(file: &str, bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| Error::malformed(file, e))?;

    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok(Vec::new());
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| Error::malformed(file, e))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_header).collect();

    let mut records = Vec::new();
    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let mut raw = RawRecord::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row
                .get(i)
                .map(cell_to_value)
                .unwrap_or_else(|| RawValue::Text(String::new()));
            raw.push(header.clone(), value);
        }
        records.push(raw);
    }

    Ok(records)
}

fn cell_to_header(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Text(String::new()),
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Text(b.to_string()),
        Data::DateTime(dt) => RawValue::Text(serial_to_datetime(dt.as_f64())),
        Data::DateTimeIso(s) => RawValue::Text(s.clone()),
        Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(_) => RawValue::Text(String::new()),
    }
}

/// Render an Excel serial date as text the normalizer's formats cover
///
/// Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug).
fn serial_to_datetime(serial: f64) -> String {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let seconds = (serial * 86_400.0).round() as i64;
    (base + chrono::Duration::seconds(seconds))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_to_datetime() {
        assert_eq!(serial_to_datetime(45667.0), "2025-01-10 00:00:00");
        assert_eq!(serial_to_datetime(45667.5), "2025-01-10 12:00:00");
    }

    #[test]
    fn test_cell_values_close_into_raw_values() {
        assert_eq!(
            cell_to_value(&Data::String("Trade".to_string())),
            RawValue::Text("Trade".to_string())
        );
        assert_eq!(cell_to_value(&Data::Float(1.5)), RawValue::Number(1.5));
        assert_eq!(cell_to_value(&Data::Int(7)), RawValue::Number(7.0));
        assert_eq!(
            cell_to_value(&Data::Bool(true)),
            RawValue::Text("true".to_string())
        );
        assert_eq!(
            cell_to_value(&Data::Empty),
            RawValue::Text(String::new())
        );
    }

    #[test]
    fn test_garbage_bytes_are_malformed() {
        let err = parse("export.xlsx", b"definitely not a workbook").unwrap_err();
        assert!(matches!(err, Error::MalformedContent { .. }));
    }
}
