//! Tabular-text parser (CSV)

use crate::domain::result::{Error, Result};
use crate::domain::{RawRecord, RawValue};

/// Parse CSV bytes into raw records keyed by the header row
///
/// Blank rows are skipped silently. Cells beyond the header width are
/// dropped; short rows simply omit the trailing fields.
pub(crate) fn parse(file: &str, bytes: &[u8]) -> Result<Vec<RawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| Error::malformed(file, e))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| Error::malformed(file, e))?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut raw = RawRecord::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(field) = row.get(i) {
                raw.push(header, RawValue::Text(field.to_string()));
            }
        }
        records.push(raw);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_keys_every_row() {
        let data = b"Date,Type,Buy Amount\n2025-01-15,Trade,0.5\n2025-01-16,Deposit,100\n";
        let records = parse("trades.csv", data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0].get("Type"),
            Some(&RawValue::Text("Trade".to_string()))
        );
        assert_eq!(
            records[1].get("Buy Amount"),
            Some(&RawValue::Text("100".to_string()))
        );
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let data = b"Date,Type\n2025-01-15,Trade\n,\n\n2025-01-16,Deposit\n";
        let records = parse("trades.csv", data).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_short_rows_omit_trailing_fields() {
        let data = b"Date,Type,Fee\n2025-01-15,Trade\n";
        let records = parse("trades.csv", data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 2);
        assert_eq!(records[0].get("Fee"), None);
    }

    #[test]
    fn test_header_only_file_yields_no_records() {
        let records = parse("trades.csv", b"Date,Type\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let data = b"Date,Type\n\xff\xfe,Trade\n";
        let err = parse("trades.csv", data).unwrap_err();
        assert!(matches!(err, Error::MalformedContent { .. }));
    }
}
