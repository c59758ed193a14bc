//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TenantNotFound
            | Self::SessionNotFound
            | Self::ServiceNotFound
            | Self::OperatorNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::SlotTaken => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::NetworkError | Self::TimeoutError | Self::NotificationFailed => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::BusinessInfoMissing => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::TenantNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::SessionNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ServiceNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::OperatorNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::SlotTaken.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::BusinessInfoMissing.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_unavailable_status() {
        assert_eq!(
            ErrorCode::NetworkError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::TimeoutError.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::NotificationFailed.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_bad_request_status() {
        // Validation and business rule errors default to 400
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidRequest.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidFormat.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::BookingEmpty.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::GuardRailBlocked.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::NothingToCancel.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::ServiceNotBookable.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
