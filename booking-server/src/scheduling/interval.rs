//! Half-open minute intervals on a single day's timeline.

/// `[start, end)` in minutes since midnight.
///
/// All comparisons are half-open: an interval ending exactly when
/// another starts does not overlap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Interval {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn duration(&self) -> i64 {
        (self.end - self.start).max(0)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, minute: i64) -> bool {
        self.start <= minute && minute < self.end
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn covers(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Intersect with `bounds`; None when nothing remains.
    pub fn clip(&self, bounds: &Interval) -> Option<Interval> {
        let clipped = Interval::new(self.start.max(bounds.start), self.end.min(bounds.end));
        if clipped.is_empty() { None } else { Some(clipped) }
    }
}

/// Coalesce intervals into a minimal sorted cover.
///
/// Overlapping or touching intervals become one; empty inputs are
/// dropped. The result is sorted and pairwise disjoint.
pub fn merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|i| !i.is_empty());
    intervals.sort();
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}
