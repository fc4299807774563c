//! Display formatting for streamer listings

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;
use tracing::debug;

const CREATED_AT_FORMAT: &str = "%Y年%m月%d日 %H:%M";

/// Human label for a platform identifier
pub fn format_platform_name(platform: Option<&str>) -> String {
    let Some(platform) = platform.filter(|p| !p.is_empty()) else {
        return "未知平台".to_string();
    };

    let key = platform.to_lowercase();
    if key.contains("twitch") {
        "Twitch".to_string()
    } else if key.contains("youtube") {
        "YouTube".to_string()
    } else {
        platform.to_string()
    }
}

/// Viewer count with thousands shortened to one decimal, e.g. `1.5K`.
///
/// Rounds the `f64` quotient the way JavaScript's `toFixed(1)` does, so
/// `1450` shows as `1.4K` because `1.45` is stored slightly below the tie.
pub fn format_viewer_count(count: u64) -> String {
    if count < 1000 {
        return count.to_string();
    }
    // Exact binary ties (x.x25, x.x75) round up rather than to even
    if count % 250 == 0 && count % 500 != 0 {
        let tenths = (count + 50) / 100;
        return format!("{}.{}K", tenths / 10, tenths % 10);
    }
    format!("{:.1}K", count as f64 / 1000.0)
}

/// RFC 3339 timestamp rendered in local time; empty when unparseable
pub fn format_created_at(value: &str) -> String {
    format_created_at_in(value, &Local)
}

/// [`format_created_at`] against an explicit time zone.
///
/// Timestamps without an offset are taken to already be in `tz`.
pub fn format_created_at_in<Tz>(value: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if value.is_empty() {
        return String::new();
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.with_timezone(tz).format(CREATED_AT_FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format(CREATED_AT_FORMAT).to_string(),
        Err(err) => {
            debug!(value, "Failed to format timestamp: {err}");
            String::new()
        }
    }
}
