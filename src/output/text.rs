//! Text output for human-readable display
//!
//! Renders the batch summary and the provider list.

use crate::batch::BatchSummary;
use colored::Colorize;
use std::io::{self, Write};

/// Text formatter for terminal output
pub struct TextFormatter {
    color: bool,
}

impl TextFormatter {
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    /// Write the summary lines of a batch run
    pub fn format_summary(&self, summary: &BatchSummary, writer: &mut dyn Write) -> io::Result<()> {
        let succeeded = format!("{} succeeded", summary.succeeded_count());
        let failed = format!("{} failed", summary.failed_count());

        if self.color {
            let failed = if summary.is_success() {
                failed.dimmed()
            } else {
                failed.red().bold()
            };
            writeln!(writer, "Summary: {}, {}", succeeded.green(), failed)?;
        } else {
            writeln!(writer, "Summary: {}, {}", succeeded, failed)?;
        }

        if !summary.is_success() {
            let names = summary.failed_names().join(", ");
            if self.color {
                writeln!(writer, "{} {}", "Failed providers:".yellow(), names)?;
            } else {
                writeln!(writer, "Failed providers: {}", names)?;
            }
        }

        Ok(())
    }

    /// Write one `  - name` line per provider
    pub fn format_provider_list(&self, names: &[String], writer: &mut dyn Write) -> io::Result<()> {
        for name in names {
            if self.color {
                writeln!(writer, "  - {}", name.cyan())?;
            } else {
                writeln!(writer, "  - {}", name)?;
            }
        }
        Ok(())
    }

    /// Write an error line, `label: message`
    pub fn format_error(&self, label: &str, message: &str, writer: &mut dyn Write) -> io::Result<()> {
        if self.color {
            writeln!(writer, "{} {}", format!("{}:", label).red().bold(), message)
        } else {
            writeln!(writer, "{}: {}", label, message)
        }
    }
}
