//! Timestamp formatting at the DTO boundary.
//!
//! Storage keeps `DateTime<Utc>`; everything handed to the presentation layer
//! is rendered with [`DISPLAY_FORMAT`]. The textual formatter accepts its own
//! output, so formatting twice is the same as formatting once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format(DISPLAY_FORMAT).to_string()
}

pub fn format_optional(value: Option<&DateTime<Utc>>) -> Option<String> {
    value.map(format_datetime)
}

/// Format a textual timestamp. Absent, blank and unparseable input all map to
/// `None`.
pub fn format_text(value: Option<&str>) -> Option<String> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }
    parse_text(text).map(|dt| format_datetime(&dt))
}

/// Parse the timestamp shapes clients send: RFC 3339, the display format
/// itself, `T`-separated naive timestamps and bare dates (midnight UTC).
pub fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in [DISPLAY_FORMAT, "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
