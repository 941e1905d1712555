//! Layout command: lanes and timeline positions for each day.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tp_core::{ActivityId, CurrencyCode, DayPlan, TimelineConfig, Trip, TripPlan};

use super::util::{
    activity_labels, format_day_heading, label_for, load_trip, parse_day, select_days,
    trip_title,
};
use crate::Config;

#[derive(Debug, Args)]
pub struct LayoutArgs {
    /// Trip document (JSON).
    pub trip: PathBuf,

    /// Only show this day (YYYY-MM-DD).
    #[arg(long)]
    pub day: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Formats the day-by-day layout as plain text.
///
/// Lanes are printed one-based. Unscheduled activities are listed last when
/// `show_unscheduled` is set.
pub fn format_layout(
    trip: &Trip,
    plan: &TripPlan,
    days: &[&DayPlan],
    timeline: &TimelineConfig,
    show_unscheduled: bool,
) -> String {
    let labels = activity_labels(trip);
    let mut output = String::new();

    writeln!(output, "TRIP LAYOUT: {}", trip_title(plan.name.as_deref())).unwrap();
    writeln!(
        output,
        "Scale: {}px per hour, minimum height {}px",
        timeline.hour_height, timeline.min_height
    )
    .unwrap();

    if days.is_empty() {
        writeln!(output).unwrap();
        writeln!(output, "No scheduled activities.").unwrap();
    }

    for day in days {
        let heading = format_day_heading(day.date);
        writeln!(output).unwrap();
        writeln!(output, "{heading}").unwrap();
        writeln!(output, "{}", "─".repeat(heading.chars().count())).unwrap();

        for activity in &day.activities {
            write!(
                output,
                "  {}-{}  {:<20} lane {}/{}  y={:.0} h={:.0}",
                activity.start.format("%H:%M"),
                activity.end.format("%H:%M"),
                label_for(&labels, &activity.id),
                activity.lane.lane + 1,
                activity.lane.total_lanes,
                activity.placement.top,
                activity.placement.height,
            )
            .unwrap();
            if activity.conflict {
                write!(output, "  CONFLICT").unwrap();
            }
            writeln!(output).unwrap();
        }

        for transport in &day.transport {
            write!(
                output,
                "  transport {}  y={:.0} h={:.0}",
                transport.segment_id, transport.top, transport.height
            )
            .unwrap();
            if let Some(overflow) = &transport.overflow_label {
                write!(output, "  continues +{overflow}").unwrap();
            }
            writeln!(output).unwrap();
        }
    }

    if show_unscheduled && !plan.unscheduled.is_empty() {
        let names: Vec<&str> = plan
            .unscheduled
            .iter()
            .map(|id| label_for(&labels, id))
            .collect();
        writeln!(output).unwrap();
        writeln!(output, "Unscheduled: {}", names.join(", ")).unwrap();
    }

    output
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLayout<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub base_currency: &'a CurrencyCode,
    pub hour_height: f64,
    pub min_height: f64,
    pub days: &'a [&'a DayPlan],
    pub unscheduled: &'a [ActivityId],
}

/// Formats the layout as JSON.
pub fn format_layout_json(
    plan: &TripPlan,
    days: &[&DayPlan],
    timeline: &TimelineConfig,
) -> Result<String> {
    let layout = JsonLayout {
        name: plan.name.as_deref(),
        base_currency: &plan.base_currency,
        hour_height: timeline.hour_height,
        min_height: timeline.min_height,
        days,
        unscheduled: &plan.unscheduled,
    };
    Ok(serde_json::to_string_pretty(&layout)?)
}

/// Runs the layout command.
pub fn run<W: Write>(writer: &mut W, args: &LayoutArgs, config: &Config) -> Result<()> {
    let timeline = config.timeline().context("invalid timeline scale in config")?;
    let trip = load_trip(&args.trip)?;
    let day = args.day.as_deref().map(parse_day).transpose()?;

    let plan = trip.plan(&config.base_currency, &timeline);
    let days = select_days(&plan, day)?;

    if args.json {
        writeln!(writer, "{}", format_layout_json(&plan, &days, &timeline)?)?;
    } else {
        write!(
            writer,
            "{}",
            format_layout(&trip, &plan, &days, &timeline, day.is_none())
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::util::sample_trip;

    use insta::assert_snapshot;

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR").unwrap()
    }

    #[test]
    fn test_layout_for_sample_trip() {
        let trip = sample_trip();
        let timeline = TimelineConfig::default();
        let plan = trip.plan(&eur(), &timeline);
        let days = select_days(&plan, None).unwrap();

        let output = format_layout(&trip, &plan, &days, &timeline, true);
        assert_snapshot!(output, @r"
        TRIP LAYOUT: Lisbon
        Scale: 60px per hour, minimum height 30px

        Sunday, Jun 1, 2025
        ───────────────────
          09:00-10:00  Tram 28              lane 1/2  y=540 h=60  CONFLICT
          09:30-11:00  Castelo              lane 2/2  y=570 h=90  CONFLICT
          20:00-22:30  Fado dinner          lane 1/1  y=1200 h=150
          transport night-bus  y=1350 h=90  continues +1h 0m

        Monday, Jun 2, 2025
        ───────────────────
          10:00-16:00  Sintra               lane 1/2  y=600 h=360
          11:00-12:00  Pena Palace          lane 2/2  y=660 h=60

        Unscheduled: souvenirs
        ");
    }

    #[test]
    fn test_layout_single_day_hides_unscheduled() {
        let trip = sample_trip();
        let timeline = TimelineConfig::new(48.0, 20.0).unwrap();
        let plan = trip.plan(&eur(), &timeline);
        let day = parse_day("2025-06-02").unwrap();
        let days = select_days(&plan, Some(day)).unwrap();

        let output = format_layout(&trip, &plan, &days, &timeline, false);
        assert!(output.contains("Scale: 48px per hour, minimum height 20px"));
        assert!(output.contains("Monday, Jun 2, 2025"));
        assert!(!output.contains("Sunday"));
        assert!(!output.contains("Unscheduled"));
        // 10:00 at 48px per hour
        assert!(output.contains("y=480 h=288"));
    }

    #[test]
    fn test_layout_empty_trip() {
        let trip = Trip::default();
        let timeline = TimelineConfig::default();
        let plan = trip.plan(&eur(), &timeline);
        let output = format_layout(&trip, &plan, &[], &timeline, true);
        assert_snapshot!(output, @r"
        TRIP LAYOUT: (unnamed trip)
        Scale: 60px per hour, minimum height 30px

        No scheduled activities.
        ");
    }

    #[test]
    fn test_layout_json() {
        let trip = sample_trip();
        let timeline = TimelineConfig::default();
        let plan = trip.plan(&eur(), &timeline);
        let days = select_days(&plan, None).unwrap();

        let json = format_layout_json(&plan, &days, &timeline).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["baseCurrency"], "EUR");
        assert_eq!(value["unscheduled"][0], "souvenirs");

        let castle = &value["days"][0]["activities"][1];
        assert_eq!(castle["id"], "castle");
        assert_eq!(castle["lane"], 1);
        assert_eq!(castle["totalLanes"], 2);
        assert_eq!(castle["top"], 570.0);
        assert_eq!(castle["conflict"], true);

        let bus = &value["days"][0]["transport"][0];
        assert_eq!(bus["overflowMinutes"], 60);
        assert_eq!(bus["overflowLabel"], "1h 0m");
    }

    #[test]
    fn test_run_rejects_unknown_day() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trip.json");
        std::fs::write(&path, serde_json::to_string(&sample_trip()).unwrap()).unwrap();

        let args = LayoutArgs {
            trip: path,
            day: Some("2025-07-01".to_string()),
            json: false,
        };
        let mut output = Vec::new();
        let err = run(&mut output, &args, &Config::default()).unwrap_err();
        assert!(format!("{err}").contains("no activities scheduled on 2025-07-01"));
    }
}
