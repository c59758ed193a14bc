//! Appointment Model

use serde::{Deserialize, Serialize};

/// What an appointment row represents
///
/// Every occupancy row carries an explicit kind. Blocks and placeholders
/// occupy operator time exactly like booked appointments; only the kind
/// column tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AppointmentKind {
    /// Real client booking (operator_id and service_id always set)
    Booked,
    /// Closure block; operator_id NULL means the whole business is blocked
    Block,
    /// Desk-entered hold without a real client attached
    Placeholder,
}

/// Scope of a BLOCK appointment, derived from operator_id nullability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockScope {
    /// Blocks every operator
    Global,
    /// Blocks one operator
    Operator,
}

/// Where a booking came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BookingSource {
    Web,
    Desk,
}

/// Appointment entity (one service occurrence, or a block)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: i64,
    pub kind: AppointmentKind,
    pub client_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub service_id: Option<i64>,
    /// Start instant (Unix millis)
    pub start_time: i64,
    /// Duration in minutes
    pub duration_min: i64,
    pub note: Option<String>,
    pub source: BookingSource,
    /// UUID4 linking every appointment of one web booking
    pub booking_session_id: Option<String>,
    pub is_cancelled_by_client: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Appointment {
    /// End instant (Unix millis), half-open
    pub fn end_time(&self) -> i64 {
        self.start_time + self.duration_min * 60_000
    }

    /// Scope of a BLOCK row; None for non-block kinds
    pub fn block_scope(&self) -> Option<BlockScope> {
        match self.kind {
            AppointmentKind::Block => Some(if self.operator_id.is_none() {
                BlockScope::Global
            } else {
                BlockScope::Operator
            }),
            _ => None,
        }
    }

    /// Whether this row occupies operator time
    pub fn is_occupying(&self) -> bool {
        !self.is_cancelled_by_client
    }
}

/// Insert payload used by the committer and by desk tooling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub kind: AppointmentKind,
    pub client_id: Option<i64>,
    pub operator_id: Option<i64>,
    pub service_id: Option<i64>,
    pub start_time: i64,
    pub duration_min: i64,
    pub note: Option<String>,
    pub source: BookingSource,
    pub booking_session_id: Option<String>,
}
