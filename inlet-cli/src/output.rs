//! Output formatting utilities

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a timestamp for table output
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render an epoch-milliseconds timestamp for table output
pub fn format_timestamp_ms(timestamp_ms: i64) -> String {
    use chrono::TimeZone;
    chrono::Utc
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| format_timestamp(&dt))
        .unwrap_or_else(|| timestamp_ms.to_string())
}
