//! Output formatting for the tail command

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Style};

use kfeed_protocol::{ChangeType, EventFrame};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Human-readable single-line text (default)
    Text,
    /// One JSON object per line
    Json,
}

/// Formats received event frames for the terminal
pub struct Formatter {
    format: Format,
    color: bool,
}

impl Formatter {
    /// Create a formatter; unknown format names fall back to text
    pub fn new(format: &str) -> Self {
        let format = match format.to_lowercase().as_str() {
            "json" => Format::Json,
            "text" => Format::Text,
            other => {
                tracing::warn!(format = %other, "unknown output format, using text");
                Format::Text
            }
        };
        Self {
            format,
            color: false,
        }
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Print one event frame to stdout
    pub fn print(&self, frame: &EventFrame) {
        match self.format {
            Format::Text => self.print_text(frame),
            Format::Json => self.print_json(frame),
        }
    }

    fn print_text(&self, frame: &EventFrame) {
        let (dim, change_style) = if self.color {
            (Style::new().dimmed(), change_color(frame.change))
        } else {
            (Style::new(), Style::new())
        };

        let timestamp = format_timestamp(frame.observed_at_ms);
        let object = if frame.namespace.is_empty() {
            frame.name.clone()
        } else {
            format!("{}/{}", frame.namespace, frame.name)
        };

        // Pad before styling so ANSI escapes do not skew the column width
        println!(
            "{} {} {} {} {}",
            timestamp.style(dim),
            format!("#{}", frame.sequence).style(dim),
            format!("{:8}", frame.change.as_str()).style(change_style),
            frame.resource,
            object,
        );
    }

    fn print_json(&self, frame: &EventFrame) {
        let payload: serde_json::Value = if frame.payload.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&frame.payload).unwrap_or_else(|_| {
                serde_json::Value::String(String::from_utf8_lossy(&frame.payload).into_owned())
            })
        };

        let line = serde_json::json!({
            "sequence": frame.sequence,
            "resource": frame.resource,
            "type": frame.change.as_str(),
            "namespace": frame.namespace,
            "name": frame.name,
            "observed_at": format_timestamp_iso(frame.observed_at_ms),
            "payload": payload,
        });
        println!("{line}");
    }
}

fn change_color(change: ChangeType) -> Style {
    match change {
        ChangeType::Added => Style::new().green(),
        ChangeType::Modified => Style::new().yellow(),
        ChangeType::Deleted => Style::new().red(),
    }
}

fn format_timestamp(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(ts) => ts.format("%H:%M:%S%.3f").to_string(),
        None => millis.to_string(),
    }
}

fn format_timestamp_iso(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(ts) => ts.to_rfc3339(),
        None => millis.to_string(),
    }
}
