//! Console rendering of progress and of the final outcome

use crate::splitter::RunResult;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::fmt::Write as _;
use std::time::Duration;

/// Shows progress messages on stderr
///
/// On a terminal a spinner carries the latest message and every message is
/// also printed above it. Without a terminal the messages are plain lines.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        if quiet {
            return ConsoleProgress { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {wide_msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(120));
        ConsoleProgress { bar: Some(bar) }
    }

    pub fn show(&self, message: &str) {
        let Some(bar) = &self.bar else {
            return;
        };

        if bar.is_hidden() {
            eprintln!("{message}");
        } else {
            bar.println(message);
            bar.set_message(message.to_string());
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Human-readable summary of a finished run
pub fn format_summary_text(result: &RunResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Matched {} of {} lines in {} file{}.",
        "Done.".green().bold(),
        result.lines_matched,
        result.lines_scanned,
        result.files_processed,
        if result.files_processed == 1 { "" } else { "s" }
    );
    for output in &result.outputs {
        let _ = writeln!(out, "Output file: {}", output.display().to_string().cyan());
    }

    if result.files.len() > 1 {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["#", "File", "Lines scanned", "Lines matched"]);
        for (i, stats) in result.files.iter().enumerate() {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(stats.input.display()),
                Cell::new(stats.lines_scanned),
                Cell::new(stats.lines_matched),
            ]);
        }
        let _ = writeln!(out, "\n{table}");
    }

    out
}

pub fn format_summary_json(result: &RunResult) -> String {
    serde_json::to_string_pretty(&json!({
        "status": "completed",
        "result": result,
    }))
    .unwrap_or_else(|_| "{\"status\":\"error\",\"error\":\"failed to serialize summary\"}".into())
}

/// One-line message for a run that could not start or did not finish
pub fn format_failure_text(kind: &str, message: &str) -> String {
    format!("{} {}", format!("{kind}:").red().bold(), message)
}

pub fn format_failure_json(status: &str, message: &str) -> String {
    serde_json::to_string_pretty(&json!({
        "status": status,
        "error": message,
    }))
    .unwrap_or_else(|_| "{\"status\":\"error\"}".into())
}
