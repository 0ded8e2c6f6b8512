//! Rendering of sync reports

use colored::Colorize;
use mirror_core::{SyncAction, SyncReport};

use crate::error::Result;

/// Print the report as pretty JSON on stdout.
pub fn print_json(report: &SyncReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Print a human-readable report on stdout.
pub fn print_report(report: &SyncReport) {
    if report.dry_run {
        println!("{} Dry run, nothing was changed", "=>".blue().bold());
    }

    for outcome in &report.outcomes {
        println!(
            "   {} {} {}",
            action_label(&outcome.action),
            outcome.resource_id.cyan(),
            describe(&outcome.action).dimmed()
        );
    }
    for failure in &report.failures {
        println!(
            "   {} {} {}",
            format!("{:<10}", "failed").red().bold(),
            failure.resource_id.cyan(),
            failure.error
        );
    }

    println!();
    let summary = format!(
        "{} copied, {} refreshed, {} up to date, {} evicted, {} skipped, {} failed",
        report.count("copied"),
        report.count("refreshed"),
        report.count("up-to-date"),
        report.count("evicted"),
        report.count("skipped"),
        report.failures.len()
    );
    if report.success() {
        println!("{} {}", "OK".green().bold(), summary);
    } else {
        println!("{} {}", "FAILED".red().bold(), summary);
    }
}

fn action_label(action: &SyncAction) -> colored::ColoredString {
    let label = format!("{:<10}", action.label());
    match action {
        SyncAction::Copied { .. } | SyncAction::Refreshed { .. } => label.green().bold(),
        SyncAction::Evicted { .. } => label.yellow().bold(),
        SyncAction::UpToDate { .. } | SyncAction::Skipped { .. } => label.normal(),
    }
}

fn describe(action: &SyncAction) -> String {
    match action {
        SyncAction::Copied { timestamp } | SyncAction::UpToDate { timestamp } => {
            format!("({})", timestamp)
        }
        SyncAction::Refreshed {
            previous: Some(previous),
            timestamp,
        } => format!("({} -> {})", previous, timestamp),
        SyncAction::Refreshed {
            previous: None,
            timestamp,
        } => format!("(no sidecar -> {})", timestamp),
        SyncAction::Evicted { reason } | SyncAction::Skipped { reason } => {
            format!("({})", reason)
        }
    }
}
