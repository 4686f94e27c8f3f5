use chrono::{Local, TimeZone, Utc};

/// Store records carry `lastUpdate` as epoch milliseconds. Rendered in the
/// server's local time, like every other timestamp the bot shows.
pub fn format_timestamp_millis(ms: i64) -> Option<String> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| format!("{}", dt.with_timezone(&Local).format("%d/%m/%Y %H:%M")))
}
