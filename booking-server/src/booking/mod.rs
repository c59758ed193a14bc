//! Booking service layer.
//!
//! Slot listing, booking commit and session cancellation on top of the
//! scheduling engine and the tenant repositories. Everything here works
//! against one tenant's pool; tenant routing happens in the API layer.

pub mod cancel;
pub mod commit;
pub mod slots;

pub use cancel::{confirm_cancellation, preview_cancellation};
pub use commit::{commit_booking, send_confirmation};
pub use slots::list_available_slots;

use sqlx::SqlitePool;

use crate::db::repository::{operator, service};
use crate::scheduling::ChainItem;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Operator, Service, ServiceRequestItem};

/// Load the service row behind every requested item, in request order.
///
/// Block items may be hidden from the public catalog; everything else
/// must be web-bookable. A service without a positive duration cannot
/// be scheduled at all.
pub(crate) async fn load_requested_services(
    pool: &SqlitePool,
    items: &[ServiceRequestItem],
) -> AppResult<Vec<Service>> {
    let mut services = Vec::with_capacity(items.len());
    for item in items {
        let service = service::find_by_id(pool, item.service_id)
            .await?
            .filter(|s| !s.is_deleted)
            .ok_or_else(|| AppError::service_not_found(item.service_id))?;
        if !item.is_block && !service.is_visible_online {
            return Err(AppError::service_not_found(item.service_id));
        }
        if service.duration_min <= 0 {
            return Err(AppError::new(ErrorCode::ServiceNotBookable)
                .with_detail("service_id", item.service_id));
        }
        services.push(service);
    }
    Ok(services)
}

/// Resolve an operator id that must take part in scheduling.
///
/// Distinguishes "no such operator" from "exists but hidden or deleted".
pub(crate) async fn require_schedulable<'a>(
    pool: &SqlitePool,
    schedulable: &'a [Operator],
    id: i64,
) -> AppResult<&'a Operator> {
    if let Some(op) = schedulable.iter().find(|o| o.id == id) {
        return Ok(op);
    }
    match operator::find_by_id(pool, id).await? {
        Some(_) => {
            Err(AppError::new(ErrorCode::OperatorNotSchedulable).with_detail("operator_id", id))
        }
        None => Err(AppError::operator_not_found(id)),
    }
}

/// Pair each requested item with its service row as resolver input.
pub(crate) fn chain_items(items: &[ServiceRequestItem], services: &[Service]) -> Vec<ChainItem> {
    items
        .iter()
        .zip(services)
        .map(|(item, service)| ChainItem {
            service_id: service.id,
            duration_min: service.duration_min,
            preferred_operator_id: item.preferred_operator_id,
        })
        .collect()
}

#[cfg(test)]
mod tests;
