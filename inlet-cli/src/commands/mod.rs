//! CLI command implementations

pub mod import;
pub mod logs;
pub mod sample;
pub mod sessions;
pub mod summary;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use inlet_core::{EntryPoint, InletContext, LogEvent, LoggingService, Platform};

/// Get the inlet directory from environment or default
pub fn get_inlet_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("INLET_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".inlet"))
}

/// Get or create the inlet context
pub fn get_context() -> Result<InletContext> {
    let inlet_dir = get_inlet_dir()?;

    std::fs::create_dir_all(&inlet_dir)
        .with_context(|| format!("Failed to create inlet directory: {:?}", inlet_dir))?;

    InletContext::new(&inlet_dir).context("Failed to initialize inlet context")
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let inlet_dir = get_inlet_dir().ok()?;
    std::fs::create_dir_all(&inlet_dir).ok()?;
    LoggingService::new(&inlet_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Resolve a platform tag from a CLI argument, falling back to the
/// configured default
pub fn resolve_platform(arg: Option<&str>, ctx: &InletContext) -> Result<Platform> {
    match arg {
        None => Ok(ctx.config.default_platform),
        Some(tag) => {
            let platform = Platform::from_tag(tag);
            if platform == Platform::Unknown && !tag.eq_ignore_ascii_case("unknown") {
                bail!(
                    "unrecognized platform '{}' (expected one of: {})",
                    tag,
                    Platform::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            Ok(platform)
        }
    }
}
