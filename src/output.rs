use crate::models::{ChangeRequest, Incident};
use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::Path;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

// Separator width the downstream Rundeck log parser expects.
const SEPARATOR_WIDTH: usize = 50;

/// ServiceNow datetimes are `YYYY-MM-DD HH:MM:SS`; only the date part is
/// useful in a job log.
fn format_date(value: Option<&str>) -> String {
    match value {
        None | Some("") => "Not set".to_string(),
        Some(v) => v.split(' ').next().unwrap_or(v).to_string(),
    }
}

fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

pub fn print_change_requests(changes: &[ChangeRequest], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let _ = serde_json::to_writer_pretty(io::stdout(), &changes);
            println!();
        }
        OutputFormat::Human => {
            println!("Found {} change requests:", changes.len());
            for change in changes {
                println!();
                println!("{}", "=".repeat(SEPARATOR_WIDTH));
                println!("Change Number: {}", field(&change.number));
                println!("Type: {}", field(&change.change_type));
                println!("State: {}", field(&change.state));
                println!("Phase: {}", field(&change.phase));
                println!("Risk: {}", field(&change.risk));
                println!("Priority: {}", field(&change.priority));
                println!("Start Date: {}", format_date(change.start_date.as_deref()));
                println!("End Date: {}", format_date(change.end_date.as_deref()));
                println!("Approval: {}", field(&change.approval));
                println!("Description: {}", field(&change.short_description));
                println!("{}", "=".repeat(SEPARATOR_WIDTH));
            }
        }
    }
}

pub fn print_incidents(incidents: &[Incident], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let _ = serde_json::to_writer_pretty(io::stdout(), &incidents);
            println!();
        }
        OutputFormat::Human => {
            println!("Found {} incidents:", incidents.len());
            for incident in incidents {
                println!("Incident Number: {}", field(&incident.number));
                println!("Description: {}", field(&incident.short_description));
                println!("---");
            }
        }
    }
}

fn render_change_summary(changes: &[ChangeRequest]) -> String {
    let mut summary = format!("Total Change Requests: {}\n", changes.len());
    for change in changes {
        summary.push_str(&format!(
            "{}: {}\n",
            field(&change.number),
            field(&change.short_description)
        ));
    }
    summary
}

/// One line per change request, preceded by the total, for downstream jobs
/// that only need the headline list.
pub fn write_change_summary(path: &Path, changes: &[ChangeRequest]) -> Result<()> {
    fs::write(path, render_change_summary(changes))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// The bare record count, no trailing newline, so jobs can splice it into a
/// variable verbatim.
pub fn write_count(path: &Path, count: usize) -> Result<()> {
    fs::write(path, count.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))
}
