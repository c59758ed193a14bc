//! Candidate start-time scan over the day's working envelope.

use std::collections::BTreeMap;

use shared::models::Operator;

use super::availability::AvailabilityIndex;
use super::capability::CapabilityMap;
use super::resolver::{ChainItem, OperatorChoice, resolve_assignment};

/// Fixed candidate step in minutes.
pub const SCAN_STEP_MIN: i64 = 15;

/// Where the target date sits relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPosition {
    /// Strictly before today: nothing is bookable
    Past,
    /// Today: candidates earlier than the current minute are dropped
    Today { minute: i64 },
    /// Strictly after today
    Future,
}

/// Scan every merged working interval at the fixed step and collect the
/// starts where the whole chain can be assigned.
///
/// Returns start minute -> one operator id per chain item, sorted
/// ascending. A chain never crosses out of the interval it starts in
/// (`start + total <= interval.end`).
pub fn scan_slots(
    chain: &[ChainItem],
    operators: &[Operator],
    index: &AvailabilityIndex,
    capabilities: &CapabilityMap,
    position: DayPosition,
    choice: &mut dyn OperatorChoice,
) -> BTreeMap<i64, Vec<i64>> {
    let mut slots = BTreeMap::new();
    if chain.is_empty() || position == DayPosition::Past {
        return slots;
    }
    let total: i64 = chain.iter().map(|c| c.duration_min).sum();

    let mut ordered: Vec<&Operator> = operators.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    for bounds in index.scan_bounds() {
        let mut start = bounds.start;
        while start + total <= bounds.end {
            if !slots.contains_key(&start) {
                if let Some(assignment) =
                    resolve_assignment(start, chain, &ordered, index, capabilities, choice)
                {
                    slots.insert(start, assignment);
                }
            }
            start += SCAN_STEP_MIN;
        }
    }

    if let DayPosition::Today { minute } = position {
        slots.retain(|&start, _| start >= minute);
    }
    slots
}
