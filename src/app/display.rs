//! Startup report output

use crate::host::api::StartupSummary;
use crate::plugin::api::{ActivationRecord, LoadReport};
use colored::Colorize;
use prettytable::{format, row, Table};

/// One row per activated plugin, in activation order
pub fn activation_table(records: &[ActivationRecord]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["#", "Plugin", "Version", "Description"]);
    for record in records {
        let info = record.plugin.plugin_info();
        table.add_row(row![
            r->record.position + 1,
            record.display_name,
            info.version,
            info.description
        ]);
    }
    table
}

pub fn summary_line(summary: &StartupSummary) -> String {
    format!(
        "{} plugins, {} commands, {} sources, {} filters, {} clients",
        summary.plugins, summary.commands, summary.sources, summary.filters, summary.clients
    )
}

/// Lines describing candidates that did not make it, if any
pub fn problem_lines(report: &LoadReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (path, error) in &report.module_failures {
        lines.push(format!("module {}: {}", path.display(), error));
    }
    for (name, error) in &report.rejected {
        lines.push(format!("rejected {}: {}", name, error));
    }
    for failed in &report.resolution.failed {
        lines.push(format!("failed {}: {}", failed.name, failed.error));
    }
    for stalled in &report.resolution.stalled {
        let mut waiting = stalled.unmet_hard.clone();
        waiting.extend(stalled.unmet_soft.iter().cloned());
        lines.push(format!(
            "stalled {}: waiting on {}",
            stalled.name,
            waiting.join(", ")
        ));
    }
    lines
}

pub fn print_startup_report(
    records: &[ActivationRecord],
    summary: &StartupSummary,
    report: Option<&LoadReport>,
) {
    if !records.is_empty() {
        activation_table(records).printstd();
    }
    println!("{}", summary_line(summary).bold());
    if let Some(report) = report {
        for line in problem_lines(report) {
            println!("{}", line.yellow());
        }
    }
}
