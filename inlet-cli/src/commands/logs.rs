//! Logs command - view recent pipeline events

use anyhow::Result;
use colored::Colorize;

use super::get_inlet_dir;
use crate::output;
use inlet_core::{EntryPoint, LoggingService};

pub fn run(limit: usize, errors: bool, json: bool) -> Result<()> {
    let inlet_dir = get_inlet_dir()?;
    std::fs::create_dir_all(&inlet_dir)?;
    let service = LoggingService::new(&inlet_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    let entries = if errors {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No log entries found.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Platform", "Kind", "Records", "Error"]);
    for entry in &entries {
        table.add_row(vec![
            output::format_timestamp_ms(entry.timestamp),
            entry.event.clone(),
            entry.source_platform.clone().unwrap_or_default(),
            entry.file_kind.clone().unwrap_or_default(),
            entry
                .record_count
                .map(|c| c.to_string())
                .unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    println!(
        "{}",
        format!(
            "{} event(s) total in {}",
            service.count()?,
            service.db_path().display()
        )
        .dimmed()
    );

    Ok(())
}
