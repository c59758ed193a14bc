//! Booking API DTOs
//!
//! Request/response types for the public booking surface, shared between
//! booking-server and its web clients.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{BusinessInfo, Operator, OperatorKind, Service};

/// Business summary shown on the booking page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSummary {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Advertised hours "HH:MM" (display, not the scheduling window)
    pub opening_time: String,
    pub closing_time: String,
    /// English weekday names with no bookings at all
    pub closing_days: Vec<String>,
}

impl From<&BusinessInfo> for BusinessSummary {
    fn from(info: &BusinessInfo) -> Self {
        Self {
            name: info.name.clone(),
            phone: info.phone.clone(),
            email: info.email.clone(),
            opening_time: info.opening_time.clone(),
            closing_time: info.closing_time.clone(),
            closing_days: info.closing_days.clone(),
        }
    }
}

/// One bookable service on the booking page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i64,
    pub price_cents: i64,
    /// Operators able to perform this service
    pub operator_ids: Vec<i64>,
}

impl From<Service> for CatalogService {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            name: service.name,
            description: service.description,
            duration_min: service.duration_min,
            price_cents: service.price_cents,
            operator_ids: service.operator_ids,
        }
    }
}

/// One pickable operator on the booking page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogOperator {
    pub id: i64,
    pub name: String,
    pub kind: OperatorKind,
}

impl From<&Operator> for CatalogOperator {
    fn from(op: &Operator) -> Self {
        Self {
            id: op.id,
            name: op.name.clone(),
            kind: op.kind,
        }
    }
}

/// Everything the booking page needs to render its pickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCatalog {
    pub business: BusinessSummary,
    pub services: Vec<CatalogService>,
    pub operators: Vec<CatalogOperator>,
}

/// One requested service, optionally pinned to an operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequestItem {
    pub service_id: i64,
    /// Explicit operator choice; the resolver never substitutes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_operator_id: Option<i64>,
    /// Marks a time-block item (desk use). Block items schedule like any
    /// other service but commit as a BLOCK appointment and trigger the
    /// duration/price guard-rails.
    #[serde(default)]
    pub is_block: bool,
}

/// Contact info submitted with a web booking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClientContact {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 5, max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Commit booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    /// "YYYY-MM-DD"
    #[validate(length(equal = 10))]
    pub date: String,
    /// "HH:MM" slot start
    #[validate(length(equal = 5))]
    pub time: String,
    #[validate(length(min = 1))]
    pub services: Vec<ServiceRequestItem>,
    /// Operator id per service, same order and length as `services`
    pub operator_assignment: Vec<i64>,
    #[validate(nested)]
    pub client: ClientContact,
}

/// One bookable start with a valid operator assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotEntry {
    /// "HH:MM"
    pub time: String,
    /// Operator id per requested service, in request order
    pub operator_ids: Vec<i64>,
}

/// Slot listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotListing {
    /// "YYYY-MM-DD"
    pub date: String,
    pub slots: Vec<SlotEntry>,
    /// Human-readable notes when slots are empty (closed day, no staff, ...)
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

/// One committed appointment within a booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentResult {
    pub service_id: i64,
    pub service_name: String,
    /// "YYYY-MM-DD"
    pub date: String,
    /// "HH:MM"
    pub time: String,
    pub duration_min: i64,
    pub price_cents: i64,
    pub operator_id: i64,
    pub operator_name: String,
}

/// Commit booking response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// UUID4 cancellation token covering the whole chain
    pub booking_session_id: String,
    pub appointments: Vec<AppointmentResult>,
    /// Guard-rail WARNING message, when one applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Cancellation preview (no mutation)
///
/// `cancellable_count == 0` means every appointment in the session is
/// already past; the session itself was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelPreview {
    pub cancellable_count: u32,
    /// Earliest future appointment "YYYY-MM-DD", when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<String>,
    /// Earliest future appointment "HH:MM", when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_time: Option<String>,
}

/// Cancellation confirm response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub cancelled_count: u32,
}
