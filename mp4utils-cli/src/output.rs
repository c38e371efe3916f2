// ============================================================================
// mp4utils-cli/src/output.rs
// ============================================================================
//
// TERMINAL OUTPUT: Plan Table and Run Summary
//
// Renders the pre-run plan and the post-run summary for the console. Lines
// are built as plain strings first so the layout can be tested; colors are
// applied only when printing.
//
// KEY COMPONENTS:
// - render_plan: one line per PlanRow, input column padded by display width
// - print_plan / print_summary: colored printing to stdout

use mp4utils_core::reporting::format_duration;
use mp4utils_core::{PlanItem, PlanRow, RunSummary};
use owo_colors::OwoColorize;
use std::path::Path;
use unicode_width::UnicodeWidthStr;

use crate::logging::use_color;

const JOIN_HEADER: &str = "JOIN/MERGE INTO:";
const JOIN_FOOTER: &str = "END";
const SINGLE_PREFIX: &str = "(SINGLE)";
const CHILD_INDENT: &str = "    ";

/// A rendered plan line together with its role, for coloring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanLine {
    Header(String),
    Item(String),
    Footer(String),
}

impl PlanLine {
    pub fn text(&self) -> &str {
        match self {
            PlanLine::Header(s) | PlanLine::Item(s) | PlanLine::Footer(s) => s,
        }
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn item_label(row: &PlanRow) -> Option<String> {
    match row {
        PlanRow::Item(item) => Some(format!("{CHILD_INDENT}{}", display(&item.input_path))),
        PlanRow::Single(item) => Some(format!("{SINGLE_PREFIX} {}", display(&item.input_path))),
        _ => None,
    }
}

fn item_line(label: &str, width: usize, item: &PlanItem) -> String {
    let padding = width.saturating_sub(label.width());
    format!(
        "{}{}  ->  {}  [v:{}k a:{}k]",
        label,
        " ".repeat(padding),
        display(&item.output_path),
        item.video_bitrate_kbps,
        item.audio_bitrate_kbps
    )
}

/// Lays out the plan rows; the input column is aligned across all items.
pub fn render_plan(rows: &[PlanRow]) -> Vec<PlanLine> {
    let width = rows
        .iter()
        .filter_map(item_label)
        .map(|label| label.width())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| match row {
            PlanRow::JoinHeader(output) => {
                PlanLine::Header(format!("{JOIN_HEADER} {}", display(output)))
            }
            PlanRow::JoinFooter => PlanLine::Footer(JOIN_FOOTER.to_string()),
            PlanRow::Item(item) | PlanRow::Single(item) => {
                let label = item_label(row).unwrap_or_default();
                PlanLine::Item(item_line(&label, width, item))
            }
        })
        .collect()
}

/// Prints the plan table to stdout.
pub fn print_plan(rows: &[PlanRow]) {
    if rows.is_empty() {
        println!("Nothing to do: no input files found.");
        return;
    }

    let color = use_color();
    println!();
    for line in render_plan(rows) {
        match (&line, color) {
            (PlanLine::Header(text), true) => println!("{}", text.cyan().bold()),
            (PlanLine::Footer(text), true) => println!("{}", text.cyan()),
            _ => println!("{}", line.text()),
        }
    }
    println!();
}

fn status_line(label: &str, value: &str) -> String {
    let label_width: usize = 14;
    let padding = label_width.saturating_sub(label.width()).max(1);
    format!("  {}:{}{}", label, " ".repeat(padding), value)
}

/// Lines of the post-run summary.
pub fn render_summary(summary: &RunSummary) -> Vec<String> {
    vec![
        status_line("Files", &summary.leaves.to_string()),
        status_line("Joins", &summary.join_targets.to_string()),
        status_line("Deleted", &summary.deleted.to_string()),
        status_line("Kept", &summary.kept.to_string()),
        status_line("Elapsed", &format_duration(&summary.elapsed)),
    ]
}

/// Prints the post-run summary to stdout.
pub fn print_summary(summary: &RunSummary, finished_at: &str) {
    let title = format!("===== RUN FINISHED {finished_at} =====");
    println!();
    if use_color() {
        if summary.all_successful() {
            println!("{}", title.green().bold());
        } else {
            println!("{}", title.yellow().bold());
        }
    } else {
        println!("{title}");
    }
    for line in render_summary(summary) {
        println!("{line}");
    }
}
