//! Shared utilities for CLI commands.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use tp_core::{ActivityId, DayPlan, Trip, TripPlan};

/// Reads and parses a trip document.
pub fn load_trip(path: &Path) -> Result<Trip> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let trip: Trip = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse trip document {}", path.display()))?;
    tracing::debug!(
        activities = trip.activities.len(),
        transport = trip.transport.len(),
        "loaded trip"
    );
    Ok(trip)
}

/// Parse a calendar date given as `YYYY-MM-DD`.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date: {s}. Use YYYY-MM-DD (e.g., 2025-06-01)"))
}

/// Picks the days to report: all of them, or just `day`.
///
/// Asking for a day with nothing scheduled is an error rather than an empty report.
pub fn select_days(plan: &TripPlan, day: Option<NaiveDate>) -> Result<Vec<&DayPlan>> {
    let Some(day) = day else {
        return Ok(plan.days.iter().collect());
    };
    let Some(found) = plan.day(day) else {
        bail!("no activities scheduled on {day}");
    };
    Ok(vec![found])
}

/// "Sunday, Jun 1, 2025"
pub fn format_day_heading(date: NaiveDate) -> String {
    date.format("%A, %b %-d, %Y").to_string()
}

/// Title line for reports.
pub fn trip_title(name: Option<&str>) -> &str {
    name.unwrap_or("(unnamed trip)")
}

/// Formats an amount with two decimals. Rounding happens only here.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Display labels for activities: their name, or their ID when unnamed.
pub fn activity_labels(trip: &Trip) -> HashMap<&ActivityId, &str> {
    trip.activities
        .iter()
        .map(|a| (&a.id, a.name.as_deref().unwrap_or(a.id.as_str())))
        .collect()
}

/// Looks up an activity's label, falling back to its ID.
pub fn label_for<'a>(labels: &HashMap<&'a ActivityId, &'a str>, id: &'a ActivityId) -> &'a str {
    labels.get(id).copied().unwrap_or_else(|| id.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        assert_eq!(
            parse_day("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_day("June 1").is_err());
        assert!(parse_day("2025-02-30").is_err());
    }

    #[test]
    fn test_format_day_heading() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(format_day_heading(date), "Sunday, Jun 1, 2025");
    }

    #[test]
    fn test_format_money_rounds_for_display() {
        assert_eq!(format_money(100.0 * 1.1), "110.00");
        assert_eq!(format_money(19.999), "20.00");
        assert_eq!(format_money(3.0), "3.00");
    }

    #[test]
    fn test_trip_title_fallback() {
        assert_eq!(trip_title(Some("Lisbon")), "Lisbon");
        assert_eq!(trip_title(None), "(unnamed trip)");
    }

    #[test]
    fn test_load_trip_reports_path_on_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("trip.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_trip(&path).unwrap_err();
        assert!(format!("{err}").contains("trip.json"));

        let missing = load_trip(&temp.path().join("missing.json")).unwrap_err();
        assert!(format!("{missing}").contains("failed to read"));
    }
}

/// A small two-day trip shared by the command tests.
#[cfg(test)]
pub(crate) fn sample_trip() -> Trip {
    serde_json::from_str(include_str!("../../tests/fixtures/lisbon.json")).unwrap()
}
