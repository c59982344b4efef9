use chrono::{DateTime, Local, TimeZone, Utc};

/// "12 April, 2026" in local time.
pub fn format_date(ts: &DateTime<Utc>) -> String {
    date_in(ts, &Local)
}

/// "12 April, 2026, 3:04 PM" in local time.
pub fn format_date_time(ts: &DateTime<Utc>) -> String {
    date_time_in(ts, &Local)
}

fn date_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%-d %B, %Y").to_string()
}

fn date_time_in<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%-d %B, %Y, %-I:%M %p").to_string()
}

/// Truncates to `max` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}
