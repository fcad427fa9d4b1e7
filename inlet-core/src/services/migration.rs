//! Migration service - manages database schema migrations
//!
//! Migrations are SQL files embedded at compile time. Each migration is
//! tracked in the sys_migrations table to ensure idempotent execution.

use duckdb::Connection;

use crate::domain::result::Result;
use crate::migrations::MIGRATIONS;

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Service for managing database migrations
pub struct MigrationService<'a> {
    conn: &'a Connection,
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Run all pending migrations
    ///
    /// Bootstraps the sys_migrations table on a fresh database, then applies
    /// anything not yet recorded, in order.
    pub fn run_pending(&self) -> Result<MigrationResult> {
        let mut newly_applied = Vec::new();

        let bootstrap_ran = if !self.migrations_table_exists()? {
            if let Some((name, sql)) = MIGRATIONS.iter().find(|(n, _)| *n == "000_migrations.sql")
            {
                self.conn.execute_batch(sql)?;
                self.record_migration(name)?;
                newly_applied.push(name.to_string());
                true
            } else {
                false
            }
        } else {
            false
        };

        let applied_set = self.get_applied()?;
        let already_applied = if bootstrap_ran {
            applied_set.len().saturating_sub(1)
        } else {
            applied_set.len()
        };

        for (name, sql) in MIGRATIONS.iter() {
            if *name == "000_migrations.sql" {
                continue; // Handled by the bootstrap above
            }
            if !applied_set.contains(&name.to_string()) {
                self.conn.execute_batch(sql)?;
                self.record_migration(name)?;
                newly_applied.push(name.to_string());
            }
        }

        Ok(MigrationResult {
            applied: newly_applied,
            already_applied,
        })
    }

    fn migrations_table_exists(&self) -> Result<bool> {
        let result: std::result::Result<i64, _> = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'sys_migrations'",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(count) => Ok(count > 0),
            Err(_) => Ok(false),
        }
    }

    /// Get list of already applied migration names
    pub fn get_applied(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT migration_name FROM sys_migrations ORDER BY migration_name")?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut result = Vec::new();
        for name in names {
            result.push(name?);
        }
        Ok(result)
    }

    fn record_migration(&self, name: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sys_migrations (migration_name) VALUES (?)",
            [name],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdb::Connection;

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        let service = MigrationService::new(&conn);

        let result = service.run_pending().unwrap();
        assert_eq!(result.applied.len(), MIGRATIONS.len());
        assert_eq!(result.already_applied, 0);

        // Running again should apply nothing
        let result2 = service.run_pending().unwrap();
        assert_eq!(result2.applied.len(), 0);
        assert_eq!(result2.already_applied, MIGRATIONS.len());
    }

    #[test]
    fn test_schema_tables_exist_after_migrations() {
        let conn = Connection::open_in_memory().unwrap();
        MigrationService::new(&conn).run_pending().unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables
                 WHERE table_name IN ('ref_sessions', 'ref_records')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 2);
    }
}
