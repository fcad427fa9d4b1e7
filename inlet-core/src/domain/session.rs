//! Import session entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::platform::Platform;
use super::summary::SummaryMeta;
use crate::format::FileKind;

/// One ingestion call: a single source file, possibly expanding to many
/// records when the container is an archive
///
/// Created with a record count of zero. Record count and cached summary
/// metadata are written exactly once, after all records for the file have
/// been appended; the row is immutable afterward and never deleted by this
/// subsystem.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub id: i64,
    pub platform: Platform,
    pub file_name: String,
    pub file_kind: FileKind,
    pub created_at: DateTime<Utc>,
    pub record_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_meta: Option<SummaryMeta>,
}
