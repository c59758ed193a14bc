//! Slot availability and operator assignment engine.
//!
//! Pure computation over a point-in-time snapshot of one day: no
//! database, no HTTP, minutes since midnight throughout. The service
//! layer loads the snapshot, localises timestamps and formats results.
//!
//! # Components
//!
//! - [`Interval`] - half-open minute intervals
//! - [`AvailabilityIndex`] - per-date working/blocked/busy snapshot
//! - [`CapabilityMap`] - service -> operator relation
//! - [`resolve_assignment`] - operator per service for one start time
//! - [`scan_slots`] - candidate scan over the working envelope

pub mod availability;
pub mod capability;
pub mod interval;
pub mod resolver;
pub mod scanner;

pub use availability::{AvailabilityIndex, BusyReason, Occupancy};
pub use capability::CapabilityMap;
pub use interval::Interval;
pub use resolver::{ChainItem, FirstChoice, OperatorChoice, RandomChoice, resolve_assignment};
pub use scanner::{DayPosition, SCAN_STEP_MIN, scan_slots};

#[cfg(test)]
mod tests;
