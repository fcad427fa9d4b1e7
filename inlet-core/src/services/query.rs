//! Query service - read-only accessors for external callers

use std::sync::Arc;

use crate::adapters::duckdb::DuckDbRepository;
use crate::domain::result::Result;
use crate::domain::{ImportSession, ImportSummary, Platform, ReferenceRecord};
use crate::services::summary::SummaryService;

/// Read-only façade over the session store
pub struct QueryService {
    repository: Arc<DuckDbRepository>,
    summary: SummaryService,
}

impl QueryService {
    pub fn new(repository: Arc<DuckDbRepository>) -> Self {
        let summary = SummaryService::new(Arc::clone(&repository));
        Self { repository, summary }
    }

    /// Latest import summary for a platform
    ///
    /// Fast path: assemble from the session's cached metadata when it is
    /// present and non-empty. Fallback: recompute from the records. Both
    /// paths return identically shaped summaries, so callers never branch
    /// on which one ran.
    pub fn latest_summary(&self, platform: Platform) -> Result<Option<ImportSummary>> {
        let Some(session) = self.repository.latest_session_for_platform(platform)? else {
            return Ok(None);
        };

        if let Some(meta) = session.summary_meta.clone().filter(|m| !m.is_empty()) {
            return Ok(Some(ImportSummary::from_parts(&session, meta)));
        }

        self.summary.compute(&session).map(Some)
    }

    /// Up to `limit` records for a session
    ///
    /// Order is unspecified but stable within a single store state.
    pub fn sample(&self, session_id: i64, limit: usize) -> Result<Vec<ReferenceRecord>> {
        self.repository.records_for_session(session_id, Some(limit))
    }

    pub fn session(&self, session_id: i64) -> Result<Option<ImportSession>> {
        self.repository.get_session(session_id)
    }
}
