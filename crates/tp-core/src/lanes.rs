//! Greedy lane assignment for overlapping activities.
//!
//! # Algorithm Summary
//!
//! 1. Sort scheduled activities by start (unscheduled ones get no lane)
//! 2. Keep a list of lane slots, each free or holding its latest occupant
//! 3. Place each activity in the first slot that is free or whose occupant it
//!    does not overlap, appending a new slot when none qualifies
//! 4. Free every slot whose occupant ended strictly before the newcomer's start
//! 5. Record how many slots are occupied as the newcomer's `total_lanes`, and
//!    widen still-active occupants that overlap it to the same count
//!
//! The packing is first-fit rather than optimal. Earlier activities keep their
//! lane when a later one is added, which keeps the rendered day stable while
//! it is being edited.

use std::collections::HashMap;

use serde::Serialize;

use crate::activity::{Activity, sorted_by_start};
use crate::types::ActivityId;

/// Horizontal position of one activity within its day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneAssignment {
    /// Zero-based lane index.
    pub lane: usize,
    /// Number of lanes sharing the activity's moment; the column is split this many ways.
    pub total_lanes: usize,
}

/// Assigns every scheduled activity a lane.
pub fn assign_lanes(activities: &[Activity]) -> HashMap<ActivityId, LaneAssignment> {
    let sorted = sorted_by_start(activities);
    let mut slots: Vec<Option<&Activity>> = Vec::new();
    let mut assignments: HashMap<ActivityId, LaneAssignment> = HashMap::new();

    for activity in sorted {
        let Some(start) = activity.scheduled_start else {
            continue;
        };

        let lane = slots
            .iter()
            .position(|slot| slot.is_none_or(|occupant| !occupant.overlaps(activity)))
            .unwrap_or(slots.len());
        if lane == slots.len() {
            slots.push(Some(activity));
        } else {
            slots[lane] = Some(activity);
        }

        // Free finished occupants. The newcomer always keeps its own slot,
        // even when its end is before its start.
        for (index, slot) in slots.iter_mut().enumerate() {
            if index == lane {
                continue;
            }
            if slot.is_some_and(|occupant| occupant.effective_end().is_some_and(|end| end < start)) {
                *slot = None;
            }
        }

        let total_lanes = slots.iter().flatten().count();
        tracing::trace!(activity = %activity.id, lane, total_lanes, "placed activity");

        for occupant in slots.iter().flatten() {
            if occupant.id == activity.id || !occupant.overlaps(activity) {
                continue;
            }
            if let Some(existing) = assignments.get_mut(&occupant.id) {
                existing.total_lanes = existing.total_lanes.max(total_lanes);
            }
        }

        assignments.insert(activity.id.clone(), LaneAssignment { lane, total_lanes });
    }

    assignments
}
