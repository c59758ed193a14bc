//! Operator Shift Model

use serde::{Deserialize, Serialize};

/// One working interval for an operator on one date
///
/// Zero or more rows per operator per date. No rows means the operator
/// defaults to the full business scheduling window for that date.
/// A row with start_time == end_time is a day off (zero working time).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OperatorShift {
    pub id: i64,
    pub operator_id: i64,
    /// "YYYY-MM-DD"
    pub shift_date: String,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub created_at: i64,
}

impl OperatorShift {
    /// Day-off marker: start == end
    pub fn is_day_off(&self) -> bool {
        self.start_time == self.end_time
    }
}

/// Create shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorShiftCreate {
    pub operator_id: i64,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_off() {
        let shift = OperatorShift {
            id: 1,
            operator_id: 1,
            shift_date: "2025-06-02".to_string(),
            start_time: "00:00".to_string(),
            end_time: "00:00".to_string(),
            created_at: 0,
        };
        assert!(shift.is_day_off());

        let working = OperatorShift {
            start_time: "09:00".to_string(),
            end_time: "13:00".to_string(),
            ..shift
        };
        assert!(!working.is_day_off());
    }
}
