//! Booking commit.
//!
//! Re-validates a client-picked slot/assignment pair, then persists the
//! whole chain atomically under one booking session. The committer does
//! not re-run the slot scan: explicit preferences, capability and a
//! transactional overlap re-check cover staleness and tampering.

use chrono_tz::Tz;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::db::repository::{appointment, business_info, client, operator};
use crate::notify::{Notifier, NotifyChannel, OutboundMessage};
use crate::utils::time::{minute_to_millis, parse_date, parse_hhmm};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    AppointmentCreate, AppointmentKind, AppointmentResult, BookingConfirmation, BookingCreate,
    BookingSource, BusinessInfo, GuardRailMode, Service, ServiceRequestItem,
};
use shared::util::format_hhmm;

pub async fn commit_booking(
    pool: &SqlitePool,
    tz: Tz,
    payload: &BookingCreate,
) -> AppResult<BookingConfirmation> {
    // 1. Structural validation, before touching any state
    if payload.services.is_empty() {
        return Err(AppError::new(ErrorCode::BookingEmpty));
    }
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    if payload
        .client
        .phone
        .as_deref()
        .is_none_or(|p| p.trim().is_empty())
    {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            "Client phone is required",
        ));
    }
    let date = parse_date(&payload.date)?;
    let start_min = parse_hhmm(&payload.time)?;
    if payload.operator_assignment.len() != payload.services.len() {
        return Err(AppError::new(ErrorCode::AssignmentLengthMismatch));
    }

    // 2. Load business rules and the requested rows
    let business = business_info::get(pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessInfoMissing))?;
    let services = super::load_requested_services(pool, &payload.services).await?;
    let schedulable = operator::find_schedulable(pool).await?;

    // 3. Per-item re-validation: explicit preference, operator, capability
    let mut operator_names = Vec::with_capacity(services.len());
    for ((item, service), &assigned) in payload
        .services
        .iter()
        .zip(&services)
        .zip(&payload.operator_assignment)
    {
        if let Some(preferred) = item.preferred_operator_id {
            if preferred != assigned {
                return Err(AppError::new(ErrorCode::PreferenceMismatch)
                    .with_detail("service_id", service.id));
            }
        }
        let op = super::require_schedulable(pool, &schedulable, assigned).await?;
        if !service.operator_ids.contains(&assigned) {
            return Err(AppError::new(ErrorCode::AssignmentNotCapable)
                .with_detail("service_id", service.id)
                .with_detail("operator_id", assigned));
        }
        operator_names.push(op.name.clone());
    }

    // 4. Guard-rails apply only to chains that contain a block item
    let warning = check_guard_rails(&business, &payload.services, &services)?;

    // 5. Resolve the client record
    let booked_client = client::find_or_create(pool, &payload.client).await?;

    // 6. Persist the chain in one transaction; a conflict anywhere rolls
    //    back every row already inserted for this session
    let session_id = Uuid::new_v4().to_string();
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let mut cursor = start_min;
    let mut start_minutes = Vec::with_capacity(services.len());
    for ((item, service), &assigned) in payload
        .services
        .iter()
        .zip(&services)
        .zip(&payload.operator_assignment)
    {
        let start_ms = minute_to_millis(date, cursor, tz);
        let end_ms = start_ms + service.duration_min * 60_000;
        let conflicts =
            appointment::count_overlapping(&mut *tx, assigned, start_ms, end_ms).await?;
        if conflicts > 0 {
            // Dropping the transaction rolls the partial chain back
            return Err(AppError::slot_taken());
        }
        appointment::insert(
            &mut *tx,
            &AppointmentCreate {
                kind: if item.is_block {
                    AppointmentKind::Block
                } else {
                    AppointmentKind::Booked
                },
                client_id: Some(booked_client.id),
                operator_id: Some(assigned),
                service_id: Some(service.id),
                start_time: start_ms,
                duration_min: service.duration_min,
                note: None,
                source: BookingSource::Web,
                booking_session_id: Some(session_id.clone()),
            },
        )
        .await?;
        start_minutes.push(cursor);
        cursor += service.duration_min;
    }
    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // 7. Per-appointment confirmation payload
    let appointments = services
        .iter()
        .zip(&payload.operator_assignment)
        .zip(operator_names)
        .zip(start_minutes)
        .map(|(((service, &operator_id), operator_name), start)| AppointmentResult {
            service_id: service.id,
            service_name: service.name.clone(),
            date: payload.date.clone(),
            time: format_hhmm(start),
            duration_min: service.duration_min,
            price_cents: service.price_cents,
            operator_id,
            operator_name,
        })
        .collect();

    Ok(BookingConfirmation {
        booking_session_id: session_id,
        appointments,
        warning,
    })
}

/// Duration cap first, then price cap; a later warning replaces an
/// earlier one, a block rejects immediately.
fn check_guard_rails(
    business: &BusinessInfo,
    items: &[ServiceRequestItem],
    services: &[Service],
) -> AppResult<Option<String>> {
    if !items.iter().any(|i| i.is_block) {
        return Ok(None);
    }
    let total_duration: i64 = services.iter().map(|s| s.duration_min).sum();
    let total_price: i64 = services.iter().map(|s| s.price_cents).sum();
    let mut warning = None;

    if let Some(cap) = business.booking_max_duration_min {
        if total_duration > cap {
            let message = business
                .duration_rule_message
                .clone()
                .unwrap_or_else(|| "Maximum booking duration exceeded".to_string());
            match business.duration_rule {
                GuardRailMode::Block => return Err(AppError::guard_rail(message)),
                GuardRailMode::Warning => warning = Some(message),
                GuardRailMode::None => {}
            }
        }
    }
    if let Some(cap) = business.booking_max_price_cents {
        if total_price > cap {
            let message = business
                .price_rule_message
                .clone()
                .unwrap_or_else(|| "Maximum booking price exceeded".to_string());
            match business.price_rule {
                GuardRailMode::Block => return Err(AppError::guard_rail(message)),
                GuardRailMode::Warning => warning = Some(message),
                GuardRailMode::None => {}
            }
        }
    }
    Ok(warning)
}

/// Compose and send the post-commit confirmation.
///
/// Failures are logged, never propagated: delivery must not undo a
/// committed booking.
pub async fn send_confirmation(
    notifier: &dyn Notifier,
    tenant: &str,
    business_name: &str,
    client_email: Option<&str>,
    confirmation: &BookingConfirmation,
) {
    let Some(email) = client_email.filter(|e| !e.trim().is_empty()) else {
        return;
    };
    let message = OutboundMessage {
        tenant: tenant.to_string(),
        channel: NotifyChannel::Email,
        recipient: email.to_string(),
        subject: Some(format!("Booking confirmation - {business_name}")),
        body: confirmation_body(confirmation),
    };
    if let Err(err) = notifier.deliver(&message).await {
        tracing::warn!(tenant, error = %err, "Confirmation delivery failed");
    }
}

fn confirmation_body(confirmation: &BookingConfirmation) -> String {
    let mut lines = Vec::new();
    if let Some(first) = confirmation.appointments.first() {
        lines.push(format!(
            "Your booking for {} at {} is confirmed.",
            first.date, first.time
        ));
        lines.push(String::new());
    }
    for appt in &confirmation.appointments {
        lines.push(format!(
            "- {} at {} with {} ({} min)",
            appt.service_name, appt.time, appt.operator_name, appt.duration_min
        ));
    }
    let total: i64 = confirmation.appointments.iter().map(|a| a.price_cents).sum();
    lines.push(String::new());
    lines.push(format!("Total: {}.{:02} EUR", total / 100, total % 100));
    lines.push(format!(
        "Cancellation code: {}",
        confirmation.booking_session_id
    ));
    lines.join("\n")
}
