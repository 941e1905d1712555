//! Cost command: per-day and trip totals in the base currency.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use tp_core::{CurrencyCode, DayCost, DayPlan, TripPlan};

use super::util::{format_day_heading, format_money, load_trip, parse_day, select_days, trip_title};
use crate::Config;

#[derive(Debug, Args)]
pub struct CostArgs {
    /// Trip document (JSON).
    pub trip: PathBuf,

    /// Only show this day (YYYY-MM-DD).
    #[arg(long)]
    pub day: Option<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

fn write_breakdown(output: &mut String, cost: &DayCost, base: &CurrencyCode) {
    if cost.breakdown.is_empty() {
        writeln!(output, "  (no costs)").unwrap();
        return;
    }
    for (currency, subtotal) in &cost.breakdown {
        if currency == base {
            writeln!(output, "  {currency} {}", format_money(subtotal.total)).unwrap();
        } else {
            writeln!(
                output,
                "  {currency} {} = {} {base}",
                format_money(subtotal.total),
                format_money(subtotal.converted_total)
            )
            .unwrap();
        }
    }
}

/// Formats the cost report as plain text.
///
/// The trip total also covers unscheduled activities, so it can exceed the
/// sum of the days shown. It is left out when `show_total` is false.
pub fn format_cost(plan: &TripPlan, days: &[&DayPlan], show_total: bool) -> String {
    let base = &plan.base_currency;
    let mut output = String::new();

    writeln!(output, "COST REPORT: {}", trip_title(plan.name.as_deref())).unwrap();
    writeln!(output, "Base currency: {base}").unwrap();

    for day in days {
        writeln!(output).unwrap();
        writeln!(
            output,
            "{}: {} {base}",
            format_day_heading(day.date),
            format_money(day.cost.total)
        )
        .unwrap();
        write_breakdown(&mut output, &day.cost, base);
    }

    if show_total {
        writeln!(output).unwrap();
        writeln!(
            output,
            "TRIP TOTAL: {} {base}",
            format_money(plan.total_cost.total)
        )
        .unwrap();
        write_breakdown(&mut output, &plan.total_cost, base);
    }

    output
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCostReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub base_currency: &'a CurrencyCode,
    pub days: Vec<JsonDayCost<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_total: Option<&'a DayCost>,
}

#[derive(Debug, Serialize)]
pub struct JsonDayCost<'a> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub cost: &'a DayCost,
}

/// Formats the cost report as JSON.
pub fn format_cost_json(plan: &TripPlan, days: &[&DayPlan], show_total: bool) -> Result<String> {
    let report = JsonCostReport {
        name: plan.name.as_deref(),
        base_currency: &plan.base_currency,
        days: days
            .iter()
            .map(|day| JsonDayCost {
                date: day.date,
                cost: &day.cost,
            })
            .collect(),
        trip_total: show_total.then_some(&plan.total_cost),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Runs the cost command.
pub fn run<W: Write>(writer: &mut W, args: &CostArgs, config: &Config) -> Result<()> {
    let timeline = config.timeline().context("invalid timeline scale in config")?;
    let trip = load_trip(&args.trip)?;
    let day = args.day.as_deref().map(parse_day).transpose()?;

    let plan = trip.plan(&config.base_currency, &timeline);
    let days = select_days(&plan, day)?;
    let show_total = day.is_none();

    if args.json {
        writeln!(writer, "{}", format_cost_json(&plan, &days, show_total)?)?;
    } else {
        write!(writer, "{}", format_cost(&plan, &days, show_total))?;
    }

    Ok(())
}
