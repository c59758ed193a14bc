//! Per-date availability index.
//!
//! Built once per request from the day's snapshot (business info,
//! schedulable operators, shift rows, occupancy rows localised to
//! minutes) and treated as immutable for the whole scan.

use std::collections::HashMap;

use shared::models::{AppointmentKind, BusinessInfo, Operator, OperatorShift};

use super::interval::{self, Interval};
use crate::utils::time::parse_hhmm_or;

/// Why an operator cannot take an interval. Diagnostic only; callers
/// need the yes/no answer for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyReason {
    /// Interval does not fit inside any working interval
    OutOfShift,
    /// Overlaps a business-wide block
    GlobalBlock,
    /// Overlaps the operator's own block
    PersonalBlock,
    /// Overlaps an appointment already assigned to the operator
    Busy,
}

impl BusyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusyReason::OutOfShift => "out of shift",
            BusyReason::GlobalBlock => "global block",
            BusyReason::PersonalBlock => "personal block",
            BusyReason::Busy => "busy",
        }
    }
}

/// One occupancy row localised to minutes on the target day.
///
/// Cancelled rows must be filtered out before building the index.
#[derive(Debug, Clone, Copy)]
pub struct Occupancy {
    pub operator_id: Option<i64>,
    pub kind: AppointmentKind,
    pub interval: Interval,
}

/// Read-only availability snapshot for one date.
#[derive(Debug)]
pub struct AvailabilityIndex {
    /// Sorted non-empty working intervals per operator
    working: HashMap<i64, Vec<Interval>>,
    /// Merged cover of all working intervals; the scan never probes outside it
    scan_bounds: Vec<Interval>,
    global_blocks: Vec<Interval>,
    personal_blocks: HashMap<i64, Vec<Interval>>,
    busy: HashMap<i64, Vec<Interval>>,
    closed_day: bool,
}

impl AvailabilityIndex {
    /// Build the index for one date.
    ///
    /// `weekday` is the English weekday name of the date, matched against
    /// the business closing-day list. A closure day short-circuits to an
    /// empty index.
    pub fn build(
        weekday: &str,
        business: &BusinessInfo,
        operators: &[Operator],
        shifts: &[OperatorShift],
        occupancy: &[Occupancy],
    ) -> Self {
        if business.is_closed_on(weekday) {
            return Self {
                working: HashMap::new(),
                scan_bounds: Vec::new(),
                global_blocks: Vec::new(),
                personal_blocks: HashMap::new(),
                busy: HashMap::new(),
                closed_day: true,
            };
        }

        let active = Interval::new(
            parse_hhmm_or(&business.active_opening_time, 8 * 60),
            parse_hhmm_or(&business.active_closing_time, 20 * 60),
        );

        let mut working: HashMap<i64, Vec<Interval>> = HashMap::new();
        for op in operators {
            let mut rows: Vec<Interval> = shifts
                .iter()
                .filter(|s| s.operator_id == op.id)
                .map(|s| {
                    Interval::new(
                        parse_hhmm_or(&s.start_time, active.start),
                        parse_hhmm_or(&s.end_time, active.end),
                    )
                })
                .collect();
            // No shift rows at all: the operator works the full active window.
            // A day-off row (start == end) clips away and leaves nothing.
            if rows.is_empty() {
                rows.push(active);
            }
            let mut clipped: Vec<Interval> =
                rows.iter().filter_map(|r| r.clip(&active)).collect();
            clipped.sort();
            if !clipped.is_empty() {
                working.insert(op.id, clipped);
            }
        }

        let scan_bounds = interval::merge(working.values().flatten().copied().collect());

        let mut global_blocks = Vec::new();
        let mut personal_blocks: HashMap<i64, Vec<Interval>> = HashMap::new();
        let mut busy: HashMap<i64, Vec<Interval>> = HashMap::new();
        for row in occupancy {
            if row.interval.is_empty() {
                continue;
            }
            match (row.kind, row.operator_id) {
                (AppointmentKind::Block, None) => global_blocks.push(row.interval),
                (AppointmentKind::Block, Some(op)) => {
                    personal_blocks.entry(op).or_default().push(row.interval)
                }
                (_, Some(op)) => busy.entry(op).or_default().push(row.interval),
                // Non-block rows without an operator occupy nobody
                (_, None) => {}
            }
        }

        Self {
            working,
            scan_bounds,
            global_blocks,
            personal_blocks,
            busy,
            closed_day: false,
        }
    }

    pub fn is_closed_day(&self) -> bool {
        self.closed_day
    }

    /// Whether anyone has any working time at all.
    pub fn has_working_time(&self) -> bool {
        !self.scan_bounds.is_empty()
    }

    pub fn scan_bounds(&self) -> &[Interval] {
        &self.scan_bounds
    }

    pub fn working(&self, operator_id: i64) -> &[Interval] {
        self.working
            .get(&operator_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the operator can take the whole interval.
    ///
    /// The interval must fit inside a single working interval and must
    /// not overlap any block or occupied time.
    pub fn availability(&self, operator_id: i64, interval: Interval) -> Result<(), BusyReason> {
        if !self.working(operator_id).iter().any(|w| w.covers(&interval)) {
            return Err(BusyReason::OutOfShift);
        }
        if self.global_blocks.iter().any(|b| b.overlaps(&interval)) {
            return Err(BusyReason::GlobalBlock);
        }
        if self
            .personal_blocks
            .get(&operator_id)
            .is_some_and(|blocks| blocks.iter().any(|b| b.overlaps(&interval)))
        {
            return Err(BusyReason::PersonalBlock);
        }
        if self
            .busy
            .get(&operator_id)
            .is_some_and(|rows| rows.iter().any(|b| b.overlaps(&interval)))
        {
            return Err(BusyReason::Busy);
        }
        Ok(())
    }

    pub fn is_available(&self, operator_id: i64, interval: Interval) -> bool {
        self.availability(operator_id, interval).is_ok()
    }
}
