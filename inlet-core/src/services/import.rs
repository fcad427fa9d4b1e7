//! Import service - the pipeline entry point
//!
//! One call ingests one source file: detect the container kind, parse every
//! container (and archive entry) into raw records, normalize each record,
//! persist raw and normalized forms under a fresh session, then compute and
//! cache the session summary.

use std::sync::Arc;

use chrono::Utc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::normalize::normalize_record;
use crate::domain::result::{Error, Result};
use crate::domain::{ImportSummary, Platform, RecordCategory, RecordDraft};
use crate::format::{detect_file_kind, parse_source, FileKind, SourceFile};
use crate::services::summary::aggregate;

/// Import service for ingesting platform export files
pub struct ImportService {
    repository: Arc<DuckDbRepository>,
}

impl ImportService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        Self { repository }
    }

    /// Ingest one export file and return its summary
    ///
    /// Unsupported extensions fail before any store access. Parsing happens
    /// before the session row is created, so a malformed file (or archive
    /// entry) aborts the call without having touched the store.
    pub fn import_file(&self, platform: Platform, source: &SourceFile) -> Result<ImportSummary> {
        let file_kind = detect_file_kind(&source.name);
        if file_kind == FileKind::Unknown {
            return Err(Error::UnsupportedFormat(source.name.clone()));
        }

        let batches = parse_source(file_kind, source)?;

        let session_id =
            self.repository
                .create_session(platform, &source.name, file_kind, Utc::now())?;

        let mut total: i64 = 0;
        for batch in batches {
            let source_file = batch.source_file;
            let drafts: Vec<RecordDraft> = batch
                .records
                .into_iter()
                .map(|raw| {
                    let normalized = normalize_record(&raw);
                    RecordDraft {
                        category: RecordCategory::Transaction,
                        source_file: source_file.clone(),
                        raw,
                        normalized,
                    }
                })
                .collect();

            total += drafts.len() as i64;
            self.repository.append_records(session_id, platform, &drafts)?;
        }

        let records = self.repository.records_for_session(session_id, None)?;
        let meta = aggregate(&records);
        self.repository
            .update_session_summary(session_id, total, Some(&meta))?;

        let session = self
            .repository
            .get_session(session_id)?
            .ok_or_else(|| Error::not_found(format!("session {}", session_id)))?;

        Ok(ImportSummary::from_parts(&session, meta))
    }
}
