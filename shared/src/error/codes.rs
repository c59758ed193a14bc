//! Unified error codes for the booking backend
//!
//! This module defines all error codes used across the server and its
//! clients. Error codes are organized by category:
//! - 0xxx: General errors
//! - 3xxx: Tenant errors
//! - 4xxx: Booking errors
//! - 6xxx: Service errors
//! - 7xxx: Schedule errors
//! - 8xxx: Operator errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found (unknown slug or missing database)
    TenantNotFound = 3001,
    /// Tenant slug is syntactically invalid
    TenantSlugInvalid = 3002,

    // ==================== 4xxx: Booking ====================
    /// Requested slot is no longer available
    SlotTaken = 4001,
    /// Operator assignment length does not match the service list
    AssignmentLengthMismatch = 4002,
    /// Assignment does not honor an explicitly preferred operator
    PreferenceMismatch = 4003,
    /// Assigned operator is not capable of the service
    AssignmentNotCapable = 4004,
    /// Booking rejected by a configured guard-rail cap
    GuardRailBlocked = 4005,
    /// Booking request contains no services
    BookingEmpty = 4006,
    /// Booking session token not found
    SessionNotFound = 4101,
    /// All appointments in the session are already past or cancelled
    NothingToCancel = 4102,

    // ==================== 6xxx: Service ====================
    /// Service not found
    ServiceNotFound = 6001,
    /// Service exists but is not bookable online
    ServiceNotBookable = 6002,

    // ==================== 7xxx: Schedule ====================
    /// Business info row missing for tenant
    BusinessInfoMissing = 7001,

    // ==================== 8xxx: Operator ====================
    /// Operator not found
    OperatorNotFound = 8001,
    /// Operator exists but is not schedulable (hidden or deleted)
    OperatorNotSchedulable = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Outbound notification delivery failed
    NotificationFailed = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Tenant
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::TenantSlugInvalid => "Tenant identifier is invalid",

            // Booking
            ErrorCode::SlotTaken => "The requested slot is no longer available",
            ErrorCode::AssignmentLengthMismatch => {
                "Operator assignment does not match the requested services"
            }
            ErrorCode::PreferenceMismatch => "Assignment does not match the chosen operator",
            ErrorCode::AssignmentNotCapable => "Assigned operator cannot perform this service",
            ErrorCode::GuardRailBlocked => "Booking rejected by a business rule",
            ErrorCode::BookingEmpty => "Booking contains no services",
            ErrorCode::SessionNotFound => "Booking not found",
            ErrorCode::NothingToCancel => "Nothing left to cancel",

            // Service
            ErrorCode::ServiceNotFound => "Service not found",
            ErrorCode::ServiceNotBookable => "Service is not bookable online",

            // Schedule
            ErrorCode::BusinessInfoMissing => "Business configuration is missing",

            // Operator
            ErrorCode::OperatorNotFound => "Operator not found",
            ErrorCode::OperatorNotSchedulable => "Operator is not schedulable",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::NotificationFailed => "Notification delivery failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Tenant
            3001 => Ok(ErrorCode::TenantNotFound),
            3002 => Ok(ErrorCode::TenantSlugInvalid),

            // Booking
            4001 => Ok(ErrorCode::SlotTaken),
            4002 => Ok(ErrorCode::AssignmentLengthMismatch),
            4003 => Ok(ErrorCode::PreferenceMismatch),
            4004 => Ok(ErrorCode::AssignmentNotCapable),
            4005 => Ok(ErrorCode::GuardRailBlocked),
            4006 => Ok(ErrorCode::BookingEmpty),
            4101 => Ok(ErrorCode::SessionNotFound),
            4102 => Ok(ErrorCode::NothingToCancel),

            // Service
            6001 => Ok(ErrorCode::ServiceNotFound),
            6002 => Ok(ErrorCode::ServiceNotBookable),

            // Schedule
            7001 => Ok(ErrorCode::BusinessInfoMissing),

            // Operator
            8001 => Ok(ErrorCode::OperatorNotFound),
            8002 => Ok(ErrorCode::OperatorNotSchedulable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9201 => Ok(ErrorCode::NotificationFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::TenantNotFound.code(), 3001);
        assert_eq!(ErrorCode::SlotTaken.code(), 4001);
        assert_eq!(ErrorCode::SessionNotFound.code(), 4101);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::TenantNotFound,
            ErrorCode::SlotTaken,
            ErrorCode::GuardRailBlocked,
            ErrorCode::NothingToCancel,
            ErrorCode::ServiceNotFound,
            ErrorCode::OperatorNotFound,
            ErrorCode::InternalError,
            ErrorCode::NotificationFailed,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert!(ErrorCode::try_from(1234).is_err());
        assert!(ErrorCode::try_from(u16::MAX).is_err());
    }

    #[test]
    fn test_serde_as_u16() {
        let json = serde_json::to_string(&ErrorCode::SlotTaken).unwrap();
        assert_eq!(json, "4001");
        let back: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(back, ErrorCode::SlotTaken);
    }
}
