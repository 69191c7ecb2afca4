use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::service::TorrentMetadata;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

/// The six rows of the details panel, always in the same order.
pub fn detail_fields(meta: &TorrentMetadata) -> [DetailField; 6] {
    [
        field("Name", text(meta.name.as_deref())),
        field(
            "Created",
            meta.created_at.as_deref().map(|raw| format_created_in(raw, &Local)),
        ),
        field("Comment", text(meta.comment.as_deref())),
        field("Info Hash", text(meta.info_hash.as_deref())),
        field("Files", meta.file_count.map(|n| format!("{n} files"))),
        field("Trackers", meta.tracker_count.map(|n| format!("{n} trackers"))),
    ]
}

fn field(label: &'static str, value: Option<String>) -> DetailField {
    DetailField {
        label,
        value: value.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Calendar date of an RFC 3339 timestamp as seen in `tz`; anything else is
/// passed through.
fn format_created_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(at) => at.with_timezone(tz).format("%Y-%m-%d").to_string(),
        Err(_) => raw.trim().to_string(),
    }
}
