//! Sample command - show records from an import session

use anyhow::{bail, Result};
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(session_id: i64, limit: Option<usize>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let limit = limit.unwrap_or(ctx.config.sample_limit);

    let Some(session) = ctx.query_service.session(session_id)? else {
        bail!("session {} not found", session_id);
    };

    let records = ctx.query_service.sample(session_id, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{} {} ({} of {} record(s))",
        "Session".cyan(),
        session.file_name,
        records.len(),
        session.record_count
    );

    if records.is_empty() {
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Id", "Date", "Type", "Buy", "Sell", "Amount", "Fee", "Source",
    ]);
    for record in &records {
        let n = &record.normalized;
        table.add_row(vec![
            record.id.to_string(),
            n.date.map(|d| output::format_timestamp(&d)).unwrap_or_default(),
            n.tx_type.clone().unwrap_or_default(),
            format_leg(n.buy_amount, n.buy_currency.as_deref()),
            format_leg(n.sell_amount, n.sell_currency.as_deref()),
            format_leg(n.amount, n.currency.as_deref()),
            format_leg(n.fee_amount, n.fee_currency.as_deref()),
            record.source_file.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);

    Ok(())
}

fn format_leg(amount: Option<f64>, currency: Option<&str>) -> String {
    match (amount, currency) {
        (Some(a), Some(c)) => format!("{} {}", a, c),
        (Some(a), None) => a.to_string(),
        (None, Some(c)) => c.to_string(),
        (None, None) => String::new(),
    }
}
