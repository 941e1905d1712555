//! Scheduling conflict detection.
//!
//! Two flavours exist and are kept apart on purpose:
//!
//! - [`detect_day_conflicts`] drives the day view. Overlapping activities only
//!   conflict when they share a participant, or when neither lists any
//!   participants (no participants means the whole group).
//! - [`detect_trip_conflicts`] builds the trip-wide report and flags every
//!   overlapping pair, ignoring participants.

use std::collections::HashSet;

use serde::Serialize;

use crate::activity::{Activity, sorted_by_start};
use crate::types::{ActivityId, MemberId};

/// Reason attached to every trip-level conflict.
pub const TIME_OVERLAP_REASON: &str = "Time overlap detected";

/// A pair of activities that cannot both happen as scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// The activity that starts first.
    pub activity1: ActivityId,
    pub activity2: ActivityId,
    pub reason: String,
}

impl Conflict {
    /// Returns true if `id` is either side of the pair.
    pub fn involves(&self, id: &ActivityId) -> bool {
        self.activity1 == *id || self.activity2 == *id
    }
}

/// Returns true if both activities need the same people.
fn shares_participants(a: &Activity, b: &Activity) -> bool {
    let a_members: HashSet<&MemberId> = a.member_ids().collect();
    let mut b_members = b.member_ids().peekable();
    if a_members.is_empty() && b_members.peek().is_none() {
        return true;
    }
    b_members.any(|m| a_members.contains(m))
}

/// Flags activities on one day that clash with an earlier one.
///
/// Each activity is compared against those starting before it and stops at
/// the first clash, so the result answers "is this activity in any conflict"
/// rather than listing every pair. Both sides of a clash are flagged.
pub fn detect_day_conflicts(activities: &[Activity]) -> HashSet<ActivityId> {
    let sorted = sorted_by_start(activities);
    let mut conflicting = HashSet::new();

    for (i, current) in sorted.iter().enumerate() {
        let clash = sorted[..i]
            .iter()
            .find(|earlier| current.overlaps(earlier) && shares_participants(current, earlier));
        if let Some(earlier) = clash {
            conflicting.insert(earlier.id.clone());
            conflicting.insert(current.id.clone());
        }
    }

    conflicting
}

/// Lists every pair of overlapping activities across a whole trip.
///
/// Pairs are ordered by the later activity's start, then by the earlier one's.
pub fn detect_trip_conflicts(activities: &[Activity]) -> Vec<Conflict> {
    let sorted = sorted_by_start(activities);
    let mut conflicts = Vec::new();

    for (i, current) in sorted.iter().enumerate() {
        for earlier in &sorted[..i] {
            if current.overlaps(earlier) {
                conflicts.push(Conflict {
                    activity1: earlier.id.clone(),
                    activity2: current.id.clone(),
                    reason: TIME_OVERLAP_REASON.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        activities = sorted.len(),
        conflicts = conflicts.len(),
        "detected trip conflicts"
    );
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::fixtures::{activity, day_ts, id, ts, with_members};

    #[test]
    fn test_overlap_without_participants_conflicts() {
        let activities = vec![
            activity("a", ts(9, 0), Some(ts(10, 0))),
            activity("b", ts(9, 30), Some(ts(10, 30))),
        ];
        let result = detect_day_conflicts(&activities);
        assert_eq!(result, HashSet::from([id("a"), id("b")]));
    }

    #[test]
    fn test_touching_activities_do_not_conflict() {
        let activities = vec![
            activity("a", ts(9, 0), Some(ts(10, 0))),
            activity("b", ts(10, 0), Some(ts(11, 0))),
        ];
        assert!(detect_day_conflicts(&activities).is_empty());
        assert!(detect_trip_conflicts(&activities).is_empty());
    }

    #[test]
    fn test_disjoint_participants_do_not_conflict() {
        let activities = vec![
            with_members(activity("a", ts(9, 0), Some(ts(10, 0))), &["alice"]),
            with_members(activity("b", ts(9, 30), Some(ts(10, 30))), &["bob"]),
        ];
        assert!(detect_day_conflicts(&activities).is_empty());
    }

    #[test]
    fn test_shared_participant_conflicts() {
        let activities = vec![
            with_members(activity("a", ts(9, 0), Some(ts(10, 0))), &["alice", "bob"]),
            with_members(activity("b", ts(9, 30), Some(ts(10, 30))), &["bob", "carol"]),
        ];
        assert_eq!(
            detect_day_conflicts(&activities),
            HashSet::from([id("a"), id("b")])
        );
    }

    #[test]
    fn test_one_sided_participants_do_not_conflict() {
        // Only an activity with no participants on both sides counts as "everyone".
        let activities = vec![
            activity("a", ts(9, 0), Some(ts(10, 0))),
            with_members(activity("b", ts(9, 30), Some(ts(10, 30))), &["bob"]),
        ];
        assert!(detect_day_conflicts(&activities).is_empty());
    }

    #[test]
    fn test_unscheduled_activities_are_ignored() {
        let activities = vec![
            activity("a", ts(9, 0), Some(ts(10, 0))),
            Activity::new(id("floating")),
        ];
        assert!(detect_day_conflicts(&activities).is_empty());
        assert!(detect_trip_conflicts(&activities).is_empty());
    }

    #[test]
    fn test_day_conflicts_flag_each_activity_once() {
        let activities = vec![
            activity("a", ts(9, 0), Some(ts(12, 0))),
            activity("b", ts(9, 30), Some(ts(12, 0))),
            activity("c", ts(10, 0), Some(ts(11, 0))),
        ];
        let result = detect_day_conflicts(&activities);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_trip_conflicts_keep_every_pair() {
        let activities = vec![
            activity("c", ts(10, 0), Some(ts(11, 0))),
            activity("a", ts(9, 0), Some(ts(12, 0))),
            activity("b", ts(9, 30), Some(ts(12, 0))),
        ];
        let pairs: Vec<_> = detect_trip_conflicts(&activities)
            .into_iter()
            .map(|c| (c.activity1.to_string(), c.activity2.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_trip_conflicts_ignore_participants() {
        let activities = vec![
            with_members(activity("a", ts(9, 0), Some(ts(10, 0))), &["alice"]),
            with_members(activity("b", ts(9, 30), Some(ts(10, 30))), &["bob"]),
        ];
        let conflicts = detect_trip_conflicts(&activities);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].reason, "Time overlap detected");
        assert!(conflicts[0].involves(&id("a")));
        assert!(conflicts[0].involves(&id("b")));
    }

    #[test]
    fn test_trip_conflicts_across_days() {
        let activities = vec![
            activity("overnight", day_ts(1, 22, 0), Some(day_ts(2, 2, 0))),
            activity("early", day_ts(2, 1, 0), Some(day_ts(2, 3, 0))),
            activity("later", day_ts(2, 9, 0), Some(day_ts(2, 10, 0))),
        ];
        let conflicts = detect_trip_conflicts(&activities);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].activity1, id("overnight"));
        assert_eq!(conflicts[0].activity2, id("early"));
    }

    #[test]
    fn test_conflicts_only_between_overlapping() {
        let activities = vec![
            activity("a", ts(8, 0), Some(ts(9, 0))),
            activity("b", ts(8, 30), Some(ts(9, 30))),
            activity("c", ts(9, 30), Some(ts(10, 0))),
            activity("d", ts(13, 0), None),
            activity("e", ts(18, 0), Some(ts(19, 0))),
        ];
        for conflict in detect_trip_conflicts(&activities) {
            let first = activities.iter().find(|a| a.id == conflict.activity1).unwrap();
            let second = activities.iter().find(|a| a.id == conflict.activity2).unwrap();
            assert!(first.overlaps(second));
        }
        let flagged = detect_day_conflicts(&activities);
        assert_eq!(
            flagged,
            HashSet::from([id("a"), id("b"), id("d"), id("e")])
        );
    }
}
