use crate::recorder::StateChangeRecord;
use crate::trace::annotator::BRANCH_MARKER;
use crate::trace::ELLIPSIS;
use crossterm::style::Stylize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pretty printing utilities for recorded state changes
pub struct Formatter;

impl Formatter {
    /// Format the one-line summary of a change.
    pub fn format_change_summary(record: &StateChangeRecord) -> String {
        format!(
            "{}: {} -> {}",
            record.property_name, record.from_value, record.to_value
        )
    }

    /// Format an annotated trace, highlighting source previews and elided frames.
    pub fn format_trace(trace: &str) -> String {
        trace
            .lines()
            .map(|line| {
                if line == ELLIPSIS {
                    Self::apply_color(line, ColorKind::Muted)
                } else if line.starts_with(BRANCH_MARKER) {
                    Self::apply_color(line, ColorKind::Success)
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a full record for terminal display.
    pub fn format_record(record: &StateChangeRecord) -> String {
        let mut lines = vec![Self::info(Self::format_change_summary(record))];
        if !record.source_line_preview.is_empty() {
            lines.push(format!("  source: {}", record.source_line_preview));
        }
        lines.push(String::new());
        lines.push(Self::format_trace(&record.annotated_trace));
        lines.join("\n")
    }

    /// Format an informational message in blue.
    pub fn info(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Info)
    }

    /// Format a warning message in yellow.
    pub fn warning(message: impl AsRef<str>) -> String {
        Self::apply_color(message.as_ref(), ColorKind::Warning)
    }

    /// Configure whether ANSI colors are enabled.
    pub fn configure_colors(enable: bool) {
        COLOR_ENABLED.store(enable, Ordering::Relaxed);
    }

    /// Auto-configure color output based on environment.
    pub fn configure_colors_from_env() {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self::configure_colors(!no_color);
    }

    fn apply_color(message: &str, kind: ColorKind) -> String {
        if !COLOR_ENABLED.load(Ordering::Relaxed) {
            return message.to_string();
        }

        match kind {
            ColorKind::Info => format!("{}", message.blue()),
            ColorKind::Success => format!("{}", message.green()),
            ColorKind::Warning => format!("{}", message.yellow()),
            ColorKind::Muted => format!("{}", message.dark_grey()),
        }
    }
}

#[derive(Copy, Clone)]
enum ColorKind {
    Info,
    Success,
    Warning,
    Muted,
}

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);
