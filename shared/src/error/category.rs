//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 3xxx: Tenant errors
/// - 4xxx: Booking errors
/// - 6xxx: Service errors
/// - 7xxx: Schedule errors
/// - 8xxx: Operator errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Tenant errors (3xxx)
    Tenant,
    /// Booking errors (4xxx)
    Booking,
    /// Service errors (6xxx)
    Service,
    /// Schedule errors (7xxx)
    Schedule,
    /// Operator errors (8xxx)
    Operator,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    ///
    /// Unassigned ranges fall back to General.
    pub fn from_code(code: u16) -> Self {
        match code {
            0..3000 => Self::General,
            3000..4000 => Self::Tenant,
            4000..5000 => Self::Booking,
            5000..6000 => Self::General,
            6000..7000 => Self::Service,
            7000..8000 => Self::Schedule,
            8000..9000 => Self::Operator,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Tenant => "tenant",
            Self::Booking => "booking",
            Self::Service => "service",
            Self::Schedule => "schedule",
            Self::Operator => "operator",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}
