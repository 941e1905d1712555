//! Activities and transport segments as supplied by the trip data layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::timeline::end_of_day;
use crate::types::{ActivityId, CurrencyCode, MemberId, SegmentId};

/// A member taking part in an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub member_id: MemberId,
}

/// A scheduled (or not yet scheduled) item on a trip day.
///
/// Times are trip-local wall-clock values. `scheduled_end` may be missing or
/// even earlier than `scheduled_start`; neither is treated as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_start: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_end: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<Participant>,
}

impl Activity {
    /// Creates an unscheduled activity with no cost and no participants.
    pub fn new(id: ActivityId) -> Self {
        Self {
            id,
            name: None,
            scheduled_start: None,
            scheduled_end: None,
            currency: None,
            estimated_cost: None,
            actual_cost: None,
            participants: Vec::new(),
        }
    }

    /// The trip day this activity belongs to, if it is scheduled.
    pub fn day(&self) -> Option<NaiveDate> {
        self.scheduled_start.map(|start| start.date())
    }

    /// `scheduled_end` if present, otherwise the end of the day containing
    /// `scheduled_start`. `None` for unscheduled activities.
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        self.scheduled_end
            .or_else(|| self.scheduled_start.map(|start| end_of_day(start.date())))
    }

    /// Half-open overlap on effective spans.
    ///
    /// Touching spans (one ends exactly when the other starts) do not overlap,
    /// and an unscheduled activity overlaps nothing.
    pub fn overlaps(&self, other: &Self) -> bool {
        let (Some(a_start), Some(b_start)) = (self.scheduled_start, other.scheduled_start) else {
            return false;
        };
        let (Some(a_end), Some(b_end)) = (self.effective_end(), other.effective_end()) else {
            return false;
        };
        a_end > b_start && b_end > a_start
    }

    /// Member IDs of everyone taking part. Empty means "everyone".
    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> {
        self.participants.iter().map(|p| &p.member_id)
    }
}

/// A way of getting from one activity to the next.
///
/// Several alternatives may exist for the same leg; only the one flagged
/// `is_selected` counts towards cost and is drawn on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSegment {
    pub id: SegmentId,
    pub from_activity_id: ActivityId,
    pub to_activity_id: ActivityId,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    #[serde(default)]
    pub is_selected: bool,
    /// Free-form mode label such as "train" or "walk".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// Sorts scheduled activities by start, dropping unscheduled ones.
///
/// The sort is stable, so activities sharing a start keep their input order.
pub(crate) fn sorted_by_start(activities: &[Activity]) -> Vec<&Activity> {
    let mut sorted: Vec<&Activity> = activities
        .iter()
        .filter(|a| a.scheduled_start.is_some())
        .collect();
    sorted.sort_by_key(|a| a.scheduled_start);
    sorted
}


#[cfg(test)]
mod tests {
    use super::fixtures::{activity, day_ts, ts};
    use super::*;

    #[test]
    fn test_effective_end_defaults_to_end_of_day() {
        let a = activity("a", ts(22, 0), None);
        let end = a.effective_end().unwrap();
        assert_eq!(end.date(), ts(0, 0).date());
        assert_eq!(end.format("%H:%M:%S%.3f").to_string(), "23:59:59.999");
    }

    #[test]
    fn test_effective_end_none_when_unscheduled() {
        let a = Activity::new(ActivityId::new("a").unwrap());
        assert_eq!(a.effective_end(), None);
        assert_eq!(a.day(), None);
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = activity("a", ts(9, 0), Some(ts(10, 0)));
        let b = activity("b", ts(10, 0), Some(ts(11, 0)));
        let c = activity("c", ts(9, 30), Some(ts(10, 30)));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn test_open_ended_activity_overlaps_rest_of_day() {
        let open = activity("open", ts(14, 0), None);
        let evening = activity("evening", ts(21, 0), Some(ts(22, 0)));
        let next_day = activity("next", day_ts(2, 0, 0), Some(day_ts(2, 1, 0)));
        assert!(open.overlaps(&evening));
        assert!(!open.overlaps(&next_day));
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let inverted = activity("inv", ts(12, 0), Some(ts(11, 0)));
        let other = activity("other", ts(11, 30), Some(ts(12, 30)));
        assert!(!inverted.overlaps(&other));
    }

    #[test]
    fn test_sorted_by_start_drops_unscheduled() {
        let activities = vec![
            activity("late", ts(15, 0), None),
            Activity::new(ActivityId::new("floating").unwrap()),
            activity("early", ts(8, 0), None),
        ];
        let ids: Vec<_> = sorted_by_start(&activities)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_activity_deserializes_camel_case() {
        let json = r#"{
            "id": "museum",
            "scheduledStart": "2025-06-01T09:00:00",
            "currency": "eur",
            "estimatedCost": 12.5,
            "participants": [{"memberId": "alice"}]
        }"#;
        let a: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(a.scheduled_start, Some(ts(9, 0)));
        assert_eq!(a.currency.as_ref().unwrap().as_str(), "EUR");
        assert_eq!(a.member_ids().count(), 1);
    }

    #[test]
    fn test_transport_defaults_to_unselected() {
        let json = r#"{"id": "t1", "fromActivityId": "a", "toActivityId": "b"}"#;
        let t: TransportSegment = serde_json::from_str(json).unwrap();
        assert!(!t.is_selected);
        assert_eq!(t.duration_minutes, 0);
    }
}
