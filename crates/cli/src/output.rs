//! Terminal rendering of command results

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;
use subtuber_frontend_common::format::{
    format_created_at, format_platform_name, format_viewer_count,
};

/// Pretty JSON
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One row of the streamer table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamerRow {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub viewers: String,
    pub created_at: String,
}

impl StreamerRow {
    pub fn from_value(streamer: &Value) -> Self {
        Self {
            id: text(streamer, &["id", "streamer_id"]),
            name: text(streamer, &["display_name", "name", "username"]),
            platform: format_platform_name(
                first(streamer, &["platform"]).and_then(Value::as_str),
            ),
            viewers: format_viewer_count(
                first(streamer, &["viewer_count", "viewers"])
                    .and_then(Value::as_u64)
                    .unwrap_or_default(),
            ),
            created_at: first(streamer, &["created_at", "createdAt"])
                .and_then(Value::as_str)
                .map(format_created_at)
                .unwrap_or_default(),
        }
    }
}

/// Render streamers as an aligned table
pub fn streamer_table(streamers: &[Value]) -> String {
    if streamers.is_empty() {
        return "No streamers".to_string();
    }

    let rows: Vec<StreamerRow> = streamers.iter().map(StreamerRow::from_value).collect();
    let header = ["ID", "NAME", "PLATFORM", "VIEWERS", "CREATED"];

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    for row in &rows {
        push_line(&mut out, &row.cells(), &widths);
    }
    out.trim_end().to_string()
}

impl StreamerRow {
    fn cells(&self) -> [&str; 5] {
        [
            &self.id,
            &self.name,
            &self.platform,
            &self.viewers,
            &self.created_at,
        ]
    }
}

fn push_line(out: &mut String, cells: &[&str; 5], widths: &[usize; 5]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(line, "{cell}{}  ", " ".repeat(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

fn first<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| value.get(*key).filter(|v| !v.is_null()))
}

fn text(value: &Value, keys: &[&str]) -> String {
    match first(value, keys) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
