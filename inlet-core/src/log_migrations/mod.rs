//! Event-log database migrations - embedded SQL files
//!
//! Same scheme as the main schema migrations, applied to the separate
//! logs database.

pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    ("001_event_log.sql", include_str!("001_event_log.sql")),
];
