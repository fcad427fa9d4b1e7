//! DuckDB repository implementation

use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::domain::{
    ImportSession, Platform, RecordCategory, RecordDraft, ReferenceRecord, SummaryMeta,
};
use crate::format::FileKind;
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// DuckDB-backed session store
///
/// Holds the two reference tables (sessions + records). The handle is shared
/// across services via `Arc`; the caller-facing context owns its lifetime.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the store at `db_path`
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when a read command races an in-flight
    /// import from another process.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[inlet] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading; the JSON extension is statically
        // linked via the "json" Cargo feature
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<crate::services::MigrationResult> {
        let conn = self.conn.lock().unwrap();
        let migration_service = MigrationService::new(&conn);
        migration_service.run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    // === Sessions ===

    /// Persist a new session with record count zero and return its identifier
    pub fn create_session(
        &self,
        platform: Platform,
        file_name: &str,
        file_kind: FileKind,
        created_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let id = conn.query_row(
            "INSERT INTO ref_sessions (platform, file_name, file_kind, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING session_id",
            params![
                platform.as_str(),
                file_name,
                file_kind.as_str(),
                format_timestamp(&created_at),
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    pub fn get_session(&self, session_id: i64) -> Result<Option<ImportSession>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT session_id, platform, file_name, file_kind, created_at,
                    record_count, summary_meta
             FROM ref_sessions WHERE session_id = ?",
        )?;

        let session = stmt
            .query_row([session_id], |row| Ok(row_to_session(row)))
            .ok();
        Ok(session)
    }

    /// Most recent session for a platform, by creation timestamp
    pub fn latest_session_for_platform(&self, platform: Platform) -> Result<Option<ImportSession>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT session_id, platform, file_name, file_kind, created_at,
                    record_count, summary_meta
             FROM ref_sessions WHERE platform = ?
             ORDER BY created_at DESC, session_id DESC
             LIMIT 1",
        )?;

        let session = stmt
            .query_row([platform.as_str()], |row| Ok(row_to_session(row)))
            .ok();
        Ok(session)
    }

    /// Most recent sessions across all platforms, newest first
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<ImportSession>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT session_id, platform, file_name, file_kind, created_at,
                    record_count, summary_meta
             FROM ref_sessions
             ORDER BY created_at DESC, session_id DESC
             LIMIT ?",
        )?;

        let sessions = stmt
            .query_map([limit as i64], |row| Ok(row_to_session(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(sessions)
    }

    /// Write a session's final record count and cached summary metadata
    ///
    /// The single mutation a session ever receives after creation.
    pub fn update_session_summary(
        &self,
        session_id: i64,
        record_count: i64,
        summary_meta: Option<&SummaryMeta>,
    ) -> Result<()> {
        let meta_json = summary_meta.map(serde_json::to_string).transpose()?;

        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE ref_sessions SET record_count = ?, summary_meta = ?
             WHERE session_id = ?",
            params![record_count, meta_json, session_id],
        )?;

        if updated == 0 {
            return Err(Error::not_found(format!("session {}", session_id)));
        }
        Ok(())
    }

    // === Records ===

    /// Persist a batch of records for a session
    ///
    /// Atomic: all records in the batch are stored or none are, so readers
    /// never observe a partially written batch.
    pub fn append_records(
        &self,
        session_id: i64,
        platform: Platform,
        drafts: &[RecordDraft],
    ) -> Result<()> {
        if drafts.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO ref_records
                     (session_id, platform, category, source_file, raw, normalized)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )?;
            for draft in drafts {
                stmt.execute(params![
                    session_id,
                    platform.as_str(),
                    draft.category.as_str(),
                    draft.source_file,
                    serde_json::to_string(&draft.raw)?,
                    serde_json::to_string(&draft.normalized)?,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Records belonging to a session, in stable (insertion) order
    pub fn records_for_session(
        &self,
        session_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<ReferenceRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT record_id, session_id, platform, category, source_file, raw, normalized
             FROM ref_records WHERE session_id = ?
             ORDER BY record_id
             LIMIT ?",
        )?;

        let limit = limit.map(|l| l as i64).unwrap_or(i64::MAX);
        let records = stmt
            .query_map(params![session_id, limit], |row| Ok(row_to_record(row)))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(records)
    }
}

fn row_to_session(row: &duckdb::Row) -> ImportSession {
    let platform_tag: String = row.get(1).unwrap_or_default();
    let kind_tag: String = row.get(3).unwrap_or_default();
    let created_str: String = row.get(4).unwrap_or_default();
    let meta_json: Option<String> = row.get::<_, Option<String>>(6).ok().flatten();

    ImportSession {
        id: row.get(0).unwrap_or_default(),
        platform: Platform::from_tag(&platform_tag),
        file_name: row.get(2).unwrap_or_default(),
        file_kind: FileKind::from_tag(&kind_tag),
        created_at: parse_timestamp(&created_str),
        record_count: row.get(5).unwrap_or_default(),
        summary_meta: meta_json.and_then(|s| serde_json::from_str(&s).ok()),
    }
}

fn row_to_record(row: &duckdb::Row) -> ReferenceRecord {
    let platform_tag: String = row.get(2).unwrap_or_default();
    let category_tag: String = row.get(3).unwrap_or_default();
    let raw_json: String = row.get(5).unwrap_or_default();
    let normalized_json: String = row.get(6).unwrap_or_default();

    ReferenceRecord {
        id: row.get(0).unwrap_or_default(),
        session_id: row.get(1).unwrap_or_default(),
        platform: Platform::from_tag(&platform_tag),
        category: RecordCategory::from_tag(&category_tag),
        source_file: row.get::<_, Option<String>>(4).ok().flatten(),
        raw: serde_json::from_str(&raw_json).unwrap_or_default(),
        normalized: serde_json::from_str(&normalized_json).unwrap_or_default(),
    }
}

/// Fixed-width UTC text so lexicographic order matches chronological order
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_round_trip() {
        let now = Utc::now();
        let parsed = parse_timestamp(&format_timestamp(&now));
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());
    }

    #[test]
    fn test_timestamp_text_sorts_chronologically() {
        let earlier = format_timestamp(&Utc::now());
        thread::sleep(Duration::from_millis(2));
        let later = format_timestamp(&Utc::now());
        assert!(earlier < later);
    }

    #[test]
    fn test_retryable_error_detection() {
        assert!(is_retryable_error("IO Error: database is locked"));
        assert!(is_retryable_error("Resource temporarily unavailable"));
        assert!(!is_retryable_error("Catalog Error: table missing"));
    }
}
