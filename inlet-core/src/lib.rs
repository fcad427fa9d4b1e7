//! Inlet Core - reference-data import pipeline for portfolio-tracker exports
//!
//! This crate implements the pipeline following hexagonal architecture:
//!
//! - **domain**: Core entities (ImportSession, ReferenceRecord, summaries)
//!   and the field normalizer
//! - **format**: Container detection and the per-format parsers
//! - **services**: Business logic orchestration (import, summary, query)
//! - **adapters**: Concrete implementations (DuckDB session store)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod format;
mod log_migrations;
pub mod migrations;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    ImportSession, ImportSummary, NormalizedRecord, Platform, RawRecord, RawValue,
    ReferenceRecord, SummaryMeta,
};
pub use format::{detect_file_kind, FileKind, SourceFile};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Inlet operations
///
/// The primary entry point for callers. It owns the store handle's lifetime:
/// the database is opened once here and shared with every service; the
/// pipeline itself never opens or closes it.
pub struct InletContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub import_service: ImportService,
    pub summary_service: SummaryService,
    pub query_service: QueryService,
}

impl InletContext {
    /// Create a new Inlet context rooted at `inlet_dir`
    pub fn new(inlet_dir: &Path) -> Result<Self> {
        let config = Config::load(inlet_dir)?;

        let db_path = inlet_dir.join("inlet.duckdb");
        let repository = Arc::new(DuckDbRepository::new(&db_path)?);

        // Initialize schema
        repository.ensure_schema()?;

        let import_service = ImportService::new(Arc::clone(&repository));
        let summary_service = SummaryService::new(Arc::clone(&repository));
        let query_service = QueryService::new(Arc::clone(&repository));

        Ok(Self {
            config,
            repository,
            import_service,
            summary_service,
            query_service,
        })
    }
}
