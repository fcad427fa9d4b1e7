//! Summary command - show the latest import summary for a platform

use anyhow::Result;
use colored::Colorize;

use super::{get_context, resolve_platform};
use crate::commands::import::print_summary;

pub fn run(platform_arg: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let platform = resolve_platform(platform_arg, &ctx)?;

    let Some(summary) = ctx.query_service.latest_summary(platform)? else {
        if json {
            println!("null");
        } else {
            println!("No imports found for {}.", platform);
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {} (session {})",
        "Latest import:".cyan(),
        summary.file_name,
        summary.session_id
    );
    println!();
    print_summary(&summary);

    Ok(())
}
