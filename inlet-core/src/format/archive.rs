//! Archive parser (ZIP)

use std::io::{Cursor, Read};

use zip::ZipArchive;

use super::{detect_file_kind, json, sheet, tabular, FileKind, RawBatch};
use crate::domain::result::{Error, Result};

/// Parse a zip archive by delegating each recognized entry to its parser
///
/// Directory entries and entries with unrecognized extensions are skipped
/// silently; the archive never fails because of them. Failure means the
/// container itself, or a recognized entry, could not be decoded. Each
/// batch carries its entry name so records can be traced back to their
/// sub-file.
pub(crate) fn parse(file: &str, bytes: &[u8]) -> Result<Vec<RawBatch>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| Error::malformed(file, e))?;

    let mut batches = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::malformed(file, e))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        let records = match detect_file_kind(&name) {
            FileKind::Csv => tabular::parse(&name, &read_entry(&mut entry, &name)?)?,
            FileKind::Json => json::parse(&name, &read_entry(&mut entry, &name)?)?,
            FileKind::Xlsx => sheet::parse(&name, &read_entry(&mut entry, &name)?)?,
            // Nested archives and anything else are not expanded
            FileKind::Zip | FileKind::Unknown => continue,
        };

        batches.push(RawBatch {
            source_file: Some(name),
            records,
        });
    }

    Ok(batches)
}

fn read_entry(entry: &mut zip::read::ZipFile<'_>, name: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    entry
        .read_to_end(&mut data)
        .map_err(|e| Error::malformed(name, e))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_recognized_entries_are_delegated() {
        let bytes = build_zip(&[
            ("trades.csv", b"Type,Amount\nTrade,1\nDeposit,2\nTrade,3\n"),
            ("extra.json", br#"[{"Type":"Staking"},{"Type":"Airdrop"}]"#),
            ("readme.txt", b"not tabular data"),
        ]);

        let batches = parse("bundle.zip", &bytes).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].source_file.as_deref(), Some("trades.csv"));
        assert_eq!(batches[0].records.len(), 3);
        assert_eq!(batches[1].source_file.as_deref(), Some("extra.json"));
        assert_eq!(batches[1].records.len(), 2);
    }

    #[test]
    fn test_unsupported_entries_never_fail_the_archive() {
        let bytes = build_zip(&[("notes.txt", b"whatever"), ("inner.zip", b"zipception")]);
        let batches = parse("bundle.zip", &bytes).unwrap();
        assert!(batches.is_empty());
    }

    #[test]
    fn test_malformed_recognized_entry_fails() {
        let bytes = build_zip(&[("broken.json", b"{not json")]);
        let err = parse("bundle.zip", &bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedContent { file, .. } if file == "broken.json"
        ));
    }

    #[test]
    fn test_corrupt_container_fails() {
        let err = parse("bundle.zip", b"PK but not really").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedContent { file, .. } if file == "bundle.zip"
        ));
    }
}
