//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! rendering for validation reports and catalog issues.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use contentcheck_core::validation::ReportEntry;
use contentcheck_core::{CatalogIssue, ErrorReport, ValidationFailure};
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a validation report, nested rows included
    fn format_report(&self, report: &ErrorReport, use_color: bool) -> Result<String>;

    /// Format catalog issues
    fn format_issues(&self, issues: &[CatalogIssue], use_color: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_report(&self, report: &ErrorReport, use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report, use_color)),
            _ => self.format(report),
        }
    }

    fn format_issues(&self, issues: &[CatalogIssue], use_color: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_issues_human(issues, use_color)),
            _ => self.format(&issues),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Get the output format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write an error message
    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Writing data output");

        if self.format == OutputFormat::Human || !formatted.ends_with('\n') {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Write a validation report
    pub fn report(&mut self, report: &ErrorReport) -> Result<()> {
        let formatted = self.format.format_report(report, self.use_color)?;
        self.writeln(formatted.trim_end())
    }

    /// Write catalog issues
    pub fn issues(&mut self, issues: &[CatalogIssue]) -> Result<()> {
        let formatted = self.format.format_issues(issues, self.use_color)?;
        self.writeln(formatted.trim_end())
    }
}

/// Format a validation report for human reading
///
/// Nested entries are printed as numbered rows under their composite key.
pub fn format_report_human(report: &ErrorReport, use_color: bool) -> String {
    let mut output = String::new();

    if report.is_valid() {
        output.push_str("No validation failures\n");
        return output;
    }

    for (key, entries) in report.iter() {
        if use_color {
            output.push_str(&format!("{}\n", key.bold()));
        } else {
            output.push_str(&format!("{}\n", key));
        }
        push_entries(&mut output, entries, 1, use_color);
    }

    output.push_str(&format!(
        "\n{} failure(s) under {} key(s)\n",
        report.failure_count(),
        report.len()
    ));
    output
}

fn push_entries(output: &mut String, entries: &[ReportEntry], depth: usize, use_color: bool) {
    let indent = "  ".repeat(depth);
    for entry in entries {
        match entry {
            ReportEntry::Failure(failure) => {
                output.push_str(&format!("{}• {}\n", indent, describe_failure(failure, use_color)));
            }
            ReportEntry::Nested(nested) => {
                for (index, row) in nested.rows().iter().enumerate() {
                    if row.is_empty() {
                        output.push_str(&format!("{}row {}: ok\n", indent, index));
                    } else {
                        output.push_str(&format!("{}row {}:\n", indent, index));
                        push_entries(output, row, depth + 1, use_color);
                    }
                }
            }
        }
    }
}

fn describe_failure(failure: &ValidationFailure, use_color: bool) -> String {
    let members = failure.member_names.join(", ");
    let kind = format!("[{}]", failure.kind);
    if use_color {
        format!("{} {} ({})", failure.message.red(), kind.dimmed(), members)
    } else {
        format!("{} {} ({})", failure.message, kind, members)
    }
}

/// Format catalog issues for human reading
pub fn format_issues_human(issues: &[CatalogIssue], use_color: bool) -> String {
    let mut output = String::new();

    if issues.is_empty() {
        output.push_str("No catalog issues found\n");
        return output;
    }

    for issue in issues {
        let label = if issue.is_fatal() { "error" } else { "warning" };
        if !use_color {
            output.push_str(&format!("{}: {}\n", label, issue));
        } else if issue.is_fatal() {
            output.push_str(&format!("{}: {}\n", label.red().bold(), issue));
        } else {
            output.push_str(&format!("{}: {}\n", label.yellow().bold(), issue));
        }
    }

    let fatal = issues.iter().filter(|i| i.is_fatal()).count();
    output.push_str(&format!("\n{} issue(s), {} blocking\n", issues.len(), fatal));
    output
}
