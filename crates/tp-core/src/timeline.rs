//! Time-to-pixel mapping for the day timeline.
//!
//! The timeline is a vertical grid with a fixed number of pixels per hour.
//! Positions are measured from local midnight of the column's day. The raw
//! mapper never clamps; transport placement is the one consumer that does,
//! stopping at the day boundary and reporting the remainder as overflow.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::activity::{Activity, TransportSegment};
use crate::types::{SegmentId, ValidationError};

/// Vertical scale of the timeline grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineConfig {
    /// Pixels per hour.
    pub hour_height: f64,
    /// Smallest height an item is ever drawn with.
    pub min_height: f64,
}

impl TimelineConfig {
    /// Creates a config, rejecting zero, negative and non-finite sizes.
    pub fn new(hour_height: f64, min_height: f64) -> Result<Self, ValidationError> {
        for (field, value) in [("hour_height", hour_height), ("min_height", min_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NonPositive { field, value });
            }
        }
        Ok(Self {
            hour_height,
            min_height,
        })
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            hour_height: 60.0,
            min_height: 30.0,
        }
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight at the start of the following day.
pub fn next_midnight(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::days(1)
}

/// The last millisecond of `date`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    next_midnight(date) - Duration::milliseconds(1)
}

/// Whole minutes from `start` to `end`, truncated toward zero.
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Vertical offset of `time` in the column for the day containing `day_start`.
///
/// Negative before midnight and past `24 * hour_height` after the day ends.
#[allow(clippy::cast_precision_loss)]
pub fn pixel_position(time: NaiveDateTime, day_start: NaiveDateTime, hour_height: f64) -> f64 {
    let minutes = minutes_between(start_of_day(day_start.date()), time);
    minutes as f64 * hour_height / 60.0
}

/// Height of the span `start..end`, never less than `min_height`.
#[allow(clippy::cast_precision_loss)]
pub fn activity_height(
    start: NaiveDateTime,
    end: NaiveDateTime,
    hour_height: f64,
    min_height: f64,
) -> f64 {
    let minutes = minutes_between(start, end) as f64;
    (minutes * hour_height / 60.0).max(min_height)
}

/// Formats an overflow amount as `"Xh Ym"`.
pub fn format_overflow(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Where an activity is drawn in its day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityPlacement {
    pub top: f64,
    pub height: f64,
}

/// Places a scheduled activity in the column of the day it starts on.
///
/// Activities without an end are drawn down to the following midnight.
pub fn place_activity(activity: &Activity, config: &TimelineConfig) -> Option<ActivityPlacement> {
    let start = activity.scheduled_start?;
    let end = activity
        .scheduled_end
        .unwrap_or_else(|| next_midnight(start.date()));
    Some(ActivityPlacement {
        top: pixel_position(start, start, config.hour_height),
        height: activity_height(start, end, config.hour_height, config.min_height),
    })
}

/// Where a transport segment is drawn, plus any part that spills into the next day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportPlacement {
    pub segment_id: SegmentId,
    pub top: f64,
    pub height: f64,
    /// Minutes past the day boundary; zero when the segment fits.
    pub overflow_minutes: i64,
    /// `"Xh Ym"` continuation label, present only when there is overflow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow_label: Option<String>,
}

/// When a segment leaving `from` departs: its scheduled end, or one hour
/// after its start when no end is set.
pub fn departure_time(from: &Activity) -> Option<NaiveDateTime> {
    let start = from.scheduled_start?;
    Some(from.scheduled_end.unwrap_or_else(|| start + Duration::hours(1)))
}

/// Places `segment` after `from`, the activity it departs from.
///
/// The segment is drawn in the column of the day it departs on, which is
/// the next day when `from` runs past midnight. Anything past the midnight
/// after departure is cut off and reported as overflow instead of being
/// drawn in the next day's column, so overflow never exceeds the duration.
pub fn place_transport(
    segment: &TransportSegment,
    from: &Activity,
    config: &TimelineConfig,
) -> Option<TransportPlacement> {
    let depart = departure_time(from)?;
    let arrive = depart + Duration::minutes(i64::from(segment.duration_minutes));
    let boundary = next_midnight(depart.date());

    let (drawn_end, overflow_minutes) = if arrive > boundary {
        (boundary, minutes_between(boundary, arrive))
    } else {
        (arrive, 0)
    };

    Some(TransportPlacement {
        segment_id: segment.id.clone(),
        top: pixel_position(depart, depart, config.hour_height),
        height: activity_height(depart, drawn_end, config.hour_height, config.min_height),
        overflow_minutes,
        overflow_label: (overflow_minutes > 0).then(|| format_overflow(overflow_minutes)),
    })
}
