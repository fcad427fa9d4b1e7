//! Adapter implementations
//!
//! Concrete technology bindings for the pipeline:
//! - DuckDB for the session store

pub mod duckdb;
