//! Import command - ingest a platform export file

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, get_logger, log_event, resolve_platform};
use crate::output;
use inlet_core::{ImportSummary, LogEvent, SourceFile};

pub fn run(file: &Path, platform_arg: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();

    let platform = resolve_platform(platform_arg, &ctx)?;
    let source = SourceFile::from_path(file)?;

    log_event(
        &logger,
        LogEvent::new("import_started")
            .with_platform(platform.as_str())
            .with_command("import"),
    );

    let summary = match ctx.import_service.import_file(platform, &source) {
        Ok(summary) => summary,
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("import_failed")
                    .with_platform(platform.as_str())
                    .with_error(e.to_string()),
            );
            return Err(e.into());
        }
    };

    log_event(
        &logger,
        LogEvent::new("import_completed")
            .with_platform(platform.as_str())
            .with_file_kind(summary.file_kind.as_str())
            .with_record_count(summary.record_count),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} record(s) from {} (session {})",
        "Imported".green(),
        summary.record_count,
        summary.file_name,
        summary.session_id
    );
    println!();
    print_summary(&summary);

    Ok(())
}

pub fn print_summary(summary: &ImportSummary) {
    println!("  Platform: {}", summary.platform);
    println!("  Kind: {}", summary.file_kind);
    println!("  Created: {}", output::format_timestamp(&summary.created_at));
    println!("  Records: {}", summary.record_count);

    if !summary.meta.types_count.is_empty() {
        let mut table = output::create_table();
        table.set_header(vec!["Type", "Count"]);
        for (tx_type, count) in &summary.meta.types_count {
            table.add_row(vec![tx_type.clone(), count.to_string()]);
        }
        println!("{}", table);
    }

    if !summary.meta.currencies.is_empty() {
        println!("  Currencies: {}", summary.meta.currencies.join(", "));
    }
    if !summary.meta.suggested_tags.is_empty() {
        println!(
            "  Suggested tags: {}",
            summary.meta.suggested_tags.join(", ")
        );
    }
}
