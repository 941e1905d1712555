//! Trip documents and the per-day derived state computed from them.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activity::{Activity, TransportSegment, sorted_by_start};
use crate::conflict::{Conflict, detect_day_conflicts, detect_trip_conflicts};
use crate::cost::{DayCost, ExchangeRates, calculate_day_cost};
use crate::lanes::{LaneAssignment, assign_lanes};
use crate::timeline::{
    ActivityPlacement, TimelineConfig, TransportPlacement, departure_time, place_activity,
    place_transport,
};
use crate::types::{ActivityId, CurrencyCode};

/// Everything the engine needs to know about a trip.
///
/// This is the shape the data layer hands over after filtering and permission
/// checks; nothing here is validated beyond what the field types enforce.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<CurrencyCode>,
    #[serde(default)]
    pub exchange_rates: ExchangeRates,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub transport: Vec<TransportSegment>,
}

/// An activity as drawn on its day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub id: ActivityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub start: NaiveDateTime,
    /// Effective end: the scheduled end, or the last moment of the day.
    pub end: NaiveDateTime,
    #[serde(flatten)]
    pub lane: LaneAssignment,
    #[serde(flatten)]
    pub placement: ActivityPlacement,
    pub conflict: bool,
}

/// Derived state for one trip day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Ordered by start.
    pub activities: Vec<ScheduledActivity>,
    /// Selected transport departing on this day.
    pub transport: Vec<TransportPlacement>,
    pub cost: DayCost,
}

impl DayPlan {
    /// Number of activities flagged as conflicting.
    pub fn conflict_count(&self) -> usize {
        self.activities.iter().filter(|a| a.conflict).count()
    }
}

/// Derived state for a whole trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub base_currency: CurrencyCode,
    /// Ordered by date.
    pub days: Vec<DayPlan>,
    /// Activities with no start; they have no lane but still cost money.
    pub unscheduled: Vec<ActivityId>,
    /// Every overlapping pair, participants ignored.
    pub conflicts: Vec<Conflict>,
    /// All activities and selected transport, scheduled or not.
    pub total_cost: DayCost,
}

impl TripPlan {
    /// Looks up the plan for a single day.
    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.date == date)
    }
}

impl Trip {
    /// The trip's base currency, or `fallback` when the trip has none.
    pub fn base_currency_or(&self, fallback: &CurrencyCode) -> CurrencyCode {
        self.base_currency.clone().unwrap_or_else(|| fallback.clone())
    }

    /// Computes lanes, conflicts, placements and costs for every day.
    ///
    /// Days are independent of each other and are computed in parallel.
    pub fn plan(&self, fallback_currency: &CurrencyCode, config: &TimelineConfig) -> TripPlan {
        let base = self.base_currency_or(fallback_currency);

        let mut by_day: BTreeMap<NaiveDate, Vec<Activity>> = BTreeMap::new();
        let mut unscheduled = Vec::new();
        for activity in &self.activities {
            match activity.day() {
                Some(date) => by_day.entry(date).or_default().push(activity.clone()),
                None => unscheduled.push(activity.id.clone()),
            }
        }

        let segments_by_day = self.selected_transport_by_day();
        // A segment can depart on a day with no activities of its own.
        for date in segments_by_day.keys() {
            by_day.entry(*date).or_default();
        }
        let origins: HashMap<&ActivityId, &Activity> =
            self.activities.iter().map(|a| (&a.id, a)).collect();

        let days: Vec<DayPlan> = by_day
            .into_iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(date, activities)| {
                let segments = segments_by_day.get(&date).map_or(&[][..], Vec::as_slice);
                plan_day(
                    date,
                    &activities,
                    segments,
                    &origins,
                    &self.exchange_rates,
                    &base,
                    config,
                )
            })
            .collect();

        TripPlan {
            name: self.name.clone(),
            total_cost: calculate_day_cost(
                &self.activities,
                &self.transport,
                &self.exchange_rates,
                &base,
            ),
            conflicts: detect_trip_conflicts(&self.activities),
            base_currency: base,
            days,
            unscheduled,
        }
    }

    /// Groups selected transport by the day it departs on.
    ///
    /// That is usually the day of the `from` activity, but an activity running
    /// past midnight sends its transport off on the following day.
    fn selected_transport_by_day(&self) -> HashMap<NaiveDate, Vec<TransportSegment>> {
        let activities: HashMap<&ActivityId, &Activity> =
            self.activities.iter().map(|a| (&a.id, a)).collect();

        let mut by_day: HashMap<NaiveDate, Vec<TransportSegment>> = HashMap::new();
        for segment in self.transport.iter().filter(|s| s.is_selected) {
            let Some(from) = activities.get(&segment.from_activity_id) else {
                tracing::warn!(
                    segment = %segment.id,
                    from = %segment.from_activity_id,
                    "skipping transport from unknown activity"
                );
                continue;
            };
            let Some(depart) = departure_time(from) else {
                tracing::warn!(
                    segment = %segment.id,
                    from = %segment.from_activity_id,
                    "skipping transport from unscheduled activity"
                );
                continue;
            };
            by_day
                .entry(depart.date())
                .or_default()
                .push(segment.clone());
        }
        by_day
    }
}

/// Runs the lane assignor, conflict detector, mapper and cost aggregator for one day.
///
/// `segments` are the selected segments departing on `date`; `origins` must
/// hold the activity each of them departs from, whatever day that is on.
pub fn plan_day(
    date: NaiveDate,
    activities: &[Activity],
    segments: &[TransportSegment],
    origins: &HashMap<&ActivityId, &Activity>,
    rates: &ExchangeRates,
    base: &CurrencyCode,
    config: &TimelineConfig,
) -> DayPlan {
    let lanes = assign_lanes(activities);
    let conflicts = detect_day_conflicts(activities);

    let scheduled: Vec<ScheduledActivity> = sorted_by_start(activities)
        .into_iter()
        .filter_map(|activity| {
            Some(ScheduledActivity {
                id: activity.id.clone(),
                name: activity.name.clone(),
                start: activity.scheduled_start?,
                end: activity.effective_end()?,
                lane: *lanes.get(&activity.id)?,
                placement: place_activity(activity, config)?,
                conflict: conflicts.contains(&activity.id),
            })
        })
        .collect();

    let transport: Vec<TransportPlacement> = segments
        .iter()
        .filter(|s| s.is_selected)
        .filter_map(|segment| {
            let from = origins.get(&segment.from_activity_id)?;
            place_transport(segment, from, config)
        })
        .collect();

    let cost = calculate_day_cost(activities, segments, rates, base);

    tracing::debug!(
        %date,
        activities = scheduled.len(),
        conflicts = conflicts.len(),
        transport = transport.len(),
        total = cost.total,
        "planned day"
    );

    DayPlan {
        date,
        activities: scheduled,
        transport,
        cost,
    }
}
