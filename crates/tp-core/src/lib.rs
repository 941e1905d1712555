//! Core itinerary logic for the trip planner.
//!
//! This crate contains the derived, per-render state of a trip day:
//! - Timeline: mapping times to pixel offsets and heights, transport overflow
//! - Lanes: side-by-side placement of overlapping activities
//! - Conflicts: day-level (participant aware) and trip-level (pure overlap)
//! - Cost: multi-currency aggregation into the trip's base currency
//!
//! Every function here is pure. Inputs are never mutated and malformed data
//! (missing times, inverted ranges, missing rates) degrades to a best-effort
//! result instead of an error.

mod activity;
pub mod conflict;
pub mod cost;
pub mod lanes;
pub mod timeline;
pub mod trip;
pub mod types;

pub use activity::{Activity, Participant, TransportSegment};
pub use conflict::{Conflict, detect_day_conflicts, detect_trip_conflicts};
pub use cost::{CurrencyTotal, DayCost, ExchangeRates, calculate_day_cost};
pub use lanes::{LaneAssignment, assign_lanes};
pub use timeline::{TimelineConfig, TransportPlacement, activity_height, pixel_position};
pub use trip::{DayPlan, ScheduledActivity, Trip, TripPlan};
pub use types::{ActivityId, CurrencyCode, MemberId, SegmentId, ValidationError};
