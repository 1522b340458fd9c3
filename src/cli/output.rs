//! Output formatting for the CLI
//!
//! Colored output respects the NO_COLOR env var (via `colored`).

use std::fmt::Display;

use serde::Serialize;

use crate::core::storage::inspect::IndexSummary;
use crate::core::types::{IndexStats, OpenMode};

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Style for labels/headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    /// Style for file paths
    pub fn file_path(s: &str) -> ColoredString {
        s.blue()
    }

    /// Style for numbers/counts
    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for success messages
    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    /// Style for error messages
    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    /// Style for dim/secondary text
    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }
}

/// What one run did, plus what the index holds afterwards
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub index_dir: String,
    pub stats: IndexStats,
    pub summary: IndexSummary,
}

impl RunReport {
    pub fn new(index_dir: &std::path::Path, stats: IndexStats, summary: IndexSummary) -> Self {
        Self {
            index_dir: index_dir.display().to_string(),
            stats,
            summary,
        }
    }

    /// First line of the human summary, without colors
    pub fn headline(&self) -> String {
        self.render_headline(
            "Indexed",
            self.stats.documents_indexed,
            &self.index_dir,
            self.duration(),
        )
    }

    fn render_headline(
        &self,
        verb: impl Display,
        count: impl Display,
        index_dir: impl Display,
        duration: impl Display,
    ) -> String {
        format!(
            "{verb} {count} documents ({} skipped) into {index_dir} in {duration}",
            self.stats.pages_skipped
        )
    }

    fn duration(&self) -> String {
        format_duration(self.stats.duration_ms as f64 / 1000.0)
    }

    fn colored_headline(&self) -> String {
        self.render_headline(
            colors::success("Indexed"),
            colors::number(&self.stats.documents_indexed.to_string()),
            colors::file_path(&self.index_dir),
            colors::number(&self.duration()),
        )
    }

    pub fn print(&self) {
        println!("{}", self.colored_headline());

        let mode = match self.stats.mode {
            OpenMode::Created => "created",
            OpenMode::Opened => "updated",
        };
        println!(
            "  {} {}",
            colors::label("Index:"),
            colors::dim(&format!(
                "{mode}, {} documents in {} segments ({})",
                self.summary.documents,
                self.summary.segments,
                format_bytes(self.summary.size_bytes)
            ))
        );
    }
}

/// Format bytes into human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format duration into human-readable string
pub fn format_duration(secs: f64) -> String {
    if secs >= 60.0 {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{mins:.0}m {remaining_secs:.1}s")
    } else if secs >= 1.0 {
        format!("{secs:.2}s")
    } else {
        let ms = secs * 1000.0;
        format!("{ms:.0}ms")
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}: {}", colors::error("Error"), message);
}
