//! Conflicts command: every overlapping pair across the trip.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tp_core::{ActivityId, Conflict, Trip, detect_trip_conflicts};

use super::util::{activity_labels, label_for, load_trip, trip_title};
use crate::Config;

#[derive(Debug, Args)]
pub struct ConflictsArgs {
    /// Trip document (JSON).
    pub trip: PathBuf,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

fn summary_line(count: usize) -> String {
    match count {
        0 => "No conflicts found.".to_string(),
        1 => "1 conflict found.".to_string(),
        n => format!("{n} conflicts found."),
    }
}

/// Formats the conflict list as plain text.
///
/// Each line names both activities and when the overlap begins, which is the
/// start of the later one.
pub fn format_conflicts(trip: &Trip, conflicts: &[Conflict]) -> String {
    let labels = activity_labels(trip);
    let starts: HashMap<&ActivityId, _> = trip
        .activities
        .iter()
        .filter_map(|a| Some((&a.id, a.scheduled_start?)))
        .collect();
    let mut output = String::new();

    writeln!(output, "CONFLICTS: {}", trip_title(trip.name.as_deref())).unwrap();
    writeln!(output).unwrap();

    for conflict in conflicts {
        write!(
            output,
            "  {} <-> {}  {}",
            label_for(&labels, &conflict.activity1),
            label_for(&labels, &conflict.activity2),
            conflict.reason
        )
        .unwrap();
        if let Some(start) = starts.get(&conflict.activity2) {
            write!(output, " (from {})", start.format("%b %-d %H:%M")).unwrap();
        }
        writeln!(output).unwrap();
    }

    if !conflicts.is_empty() {
        writeln!(output).unwrap();
    }
    writeln!(output, "{}", summary_line(conflicts.len())).unwrap();

    output
}

/// Runs the conflicts command.
pub fn run<W: Write>(writer: &mut W, args: &ConflictsArgs, _config: &Config) -> Result<()> {
    let trip = load_trip(&args.trip)?;
    let conflicts = detect_trip_conflicts(&trip.activities);

    if args.json {
        let json = serde_json::to_string_pretty(&conflicts)
            .context("failed to serialize conflicts")?;
        writeln!(writer, "{json}")?;
    } else {
        write!(writer, "{}", format_conflicts(&trip, &conflicts))?;
    }

    Ok(())
}
