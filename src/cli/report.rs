//! Report formatting and printing.
//!
//! Kept apart from the pipeline so strsync can be used as a library.

use std::io::{self, Write};
use std::path::Path;

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use crate::core::{ConflictReport, DiffRow, DiffState, Gate, GroupedExtraction, RawExtraction};
use crate::pipeline::{FinalMapping, PublishPlan, PublishReport, Review, SuggestionReport};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

const COLUMN_GAP: &str = "  ";

/// Longest cell shown in the diff table before truncation.
const MAX_CELL_WIDTH: usize = 48;

pub fn print_review(review: &Review) {
    print_review_to(review, &mut io::stdout().lock());
}

/// Conflict warnings, the diff table, the gate and a summary line.
pub fn print_review_to<W: Write>(review: &Review, writer: &mut W) {
    print_conflicts_to(review.conflicts(), writer);

    let diff = review.diff();
    let rows = diff.visible_rows();
    if !rows.is_empty() {
        print_table(&rows, writer);
        let _ = writeln!(writer);
    }

    match review.gate() {
        Gate::UpToDate => {
            let _ = writeln!(
                writer,
                "{} {}",
                SUCCESS_MARK.green(),
                "Strings are up to date".green()
            );
        }
        Gate::Blocked => {
            let count = diff.blocking_rows().count();
            let _ = writeln!(
                writer,
                "{} {}",
                FAILURE_MARK.red(),
                format!(
                    "Sync blocked: {} row(s) must be fixed in the design (labels must match {})",
                    count,
                    crate::core::LABEL_PATTERN
                )
                .red()
                .bold()
            );
        }
        Gate::NeedsConfirmation => {
            print_summary(diff.counts(), writer);
            let _ = writeln!(
                writer,
                "{} deleting published labels needs confirmation",
                "warning:".bold().yellow()
            );
        }
        Gate::Clear => print_summary(diff.counts(), writer),
    }
}

pub fn print_conflicts_to<W: Write>(conflicts: &ConflictReport, writer: &mut W) {
    for conflict in &conflicts.conflicts {
        let values: Vec<String> = conflict
            .values
            .iter()
            .map(|value| format!("\"{}\"", display_cell(value)))
            .collect();
        let _ = writeln!(
            writer,
            "{}: label \"{}\" has {} different texts: {}",
            "warning".bold().yellow(),
            conflict.label,
            conflict.values.len(),
            values.join(", ")
        );
    }
    if !conflicts.is_empty() {
        let _ = writeln!(writer);
    }
}

/// JSON of the extraction: every value per label, or the first one.
pub fn print_extraction_to<W: Write>(
    raw: &RawExtraction,
    show_all: bool,
    writer: &mut W,
) -> serde_json::Result<()> {
    let json = if show_all {
        serde_json::to_string_pretty(raw)?
    } else {
        serde_json::to_string_pretty(&raw.grouped())?
    };
    let _ = writeln!(writer, "{}", json);
    Ok(())
}

pub fn print_extraction_summary<W: Write>(
    grouped: &GroupedExtraction,
    conflicts: &ConflictReport,
    writer: &mut W,
) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} label(s), {} with conflicting texts",
            grouped.len(),
            conflicts.len()
        )
        .green()
    );
}

pub fn print_suggestions_to<W: Write>(report: &SuggestionReport, writer: &mut W) {
    if report.suggestions.is_empty() && report.failures.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("No spelling suggestions for {} label(s)", report.reviewed).green()
        );
        return;
    }

    if !report.suggestions.is_empty() {
        let _ = writeln!(
            writer,
            "{}",
            format!("{} spelling suggestion(s):", report.suggestions.len()).bold()
        );
        for suggestion in &report.suggestions {
            let _ = writeln!(
                writer,
                "  {}: \"{}\" -> \"{}\"",
                suggestion.key.bold(),
                display_cell(&suggestion.original),
                display_cell(&suggestion.suggested).green()
            );
        }
    }
    for failure in &report.failures {
        let _ = writeln!(
            writer,
            "{} no suggestion for \"{}\": {}",
            "warning:".bold().yellow(),
            failure.key,
            failure.error
        );
    }
}

pub fn print_dry_run_to<W: Write>(mapping: &FinalMapping, plan: &PublishPlan, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {} label(s) would be published:",
        "Dry run:".cyan().bold(),
        mapping.len()
    );
    for path in plan.export_paths() {
        let _ = writeln!(writer, "  - export {}", path.display());
    }
    if plan.remote_config {
        let _ = writeln!(writer, "  - remote config");
    }
    if plan.repository {
        let _ = writeln!(writer, "  - repository snapshot");
    }
    let _ = writeln!(writer, "Run with {} to publish.", "--apply".cyan());
}

pub fn print_publish_to<W: Write>(report: &PublishReport, writer: &mut W) {
    for path in &report.exports {
        let _ = writeln!(writer, "{} wrote {}", SUCCESS_MARK.green(), path.display());
    }
    for outcome in &report.sinks {
        match &outcome.error {
            None => {
                let _ = writeln!(
                    writer,
                    "{} published to {} ({})",
                    SUCCESS_MARK.green(),
                    outcome.sink,
                    outcome.target
                );
            }
            Some(err) if err.is_precondition_failed() => {
                let _ = writeln!(
                    writer,
                    "{} {}",
                    FAILURE_MARK.red(),
                    format!(
                        "{} ({}) changed since it was read, nothing was overwritten. \
                         Run sync again to review the new version.",
                        outcome.sink, outcome.target
                    )
                    .red()
                );
            }
            Some(err) => {
                let _ = writeln!(
                    writer,
                    "{} {}",
                    FAILURE_MARK.red(),
                    format!("failed to publish to {}: {}", outcome.sink, err).red()
                );
            }
        }
    }
}

pub fn print_declined_to<W: Write>(count: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        FAILURE_MARK.red(),
        format!("Deletion of {} label(s) not confirmed, nothing was published", count).red()
    );
}

pub fn print_saved_to<W: Write>(path: &Path, writer: &mut W) {
    let _ = writeln!(writer, "{} saved {}", SUCCESS_MARK.green(), path.display());
}

// ============================================================
// Internal Functions
// ============================================================

fn print_table<W: Write>(rows: &[&DiffRow], writer: &mut W) {
    let headers = ["KEY", "FIGMA", "GITHUB", "STATE"];
    let cells: Vec<[String; 3]> = rows
        .iter()
        .map(|row| {
            [
                display_cell(&row.key),
                display_cell(&row.figma_value),
                display_cell(&row.github_value),
            ]
        })
        .collect();

    let mut widths = [0usize; 3];
    for (i, header) in headers.iter().take(3).enumerate() {
        widths[i] = cells
            .iter()
            .map(|row| UnicodeWidthStr::width(row[i].as_str()))
            .chain([header.len()])
            .max()
            .unwrap_or(0);
    }

    let mut header_line = String::new();
    for (i, header) in headers.iter().take(3).enumerate() {
        header_line.push_str(&pad(header, widths[i]));
        header_line.push_str(COLUMN_GAP);
    }
    header_line.push_str(headers[3]);
    let _ = writeln!(writer, "{}", header_line.bold());

    for (row, cells) in rows.iter().zip(&cells) {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            line.push_str(&pad(cell, widths[i]));
            line.push_str(COLUMN_GAP);
        }
        let _ = writeln!(writer, "{}{}", line, state_label(row.state));
    }
}

fn print_summary<W: Write>(counts: Vec<(DiffState, usize)>, writer: &mut W) {
    let parts: Vec<String> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(state, count)| format!("{} {}", count, state))
        .collect();
    let _ = writeln!(writer, "{} {}", "Summary:".bold(), parts.join(", "));
}

fn state_label(state: DiffState) -> ColoredString {
    let text = state.to_string();
    match state {
        DiffState::Deleted => text.red(),
        DiffState::InvalidKey | DiffState::IdenticalKeys | DiffState::Conflict => {
            text.red().bold()
        }
        DiffState::Changed => text.yellow(),
        DiffState::New => text.green(),
    }
}

/// One-line rendering of a cell: control characters escaped, long text cut.
fn display_cell(text: &str) -> String {
    let escaped = text.replace('\n', "\\n").replace('\t', "\\t");
    if UnicodeWidthStr::width(escaped.as_str()) <= MAX_CELL_WIDTH {
        return escaped;
    }
    let mut cut = String::new();
    let mut width = 0;
    for c in escaped.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > MAX_CELL_WIDTH - 1 {
            break;
        }
        width += w;
        cut.push(c);
    }
    cut.push('\u{2026}');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(current)))
}
