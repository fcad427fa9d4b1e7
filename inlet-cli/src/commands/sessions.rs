//! Sessions command - list recent import sessions

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(limit: usize, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let sessions = ctx.repository.recent_sessions(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No import sessions yet.");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Id", "Platform", "File", "Kind", "Created", "Records"]);
    for session in &sessions {
        table.add_row(vec![
            session.id.to_string(),
            session.platform.to_string(),
            session.file_name.clone(),
            session.file_kind.to_string(),
            output::format_timestamp(&session.created_at),
            session.record_count.to_string(),
        ]);
    }
    println!("{}", table);

    Ok(())
}
