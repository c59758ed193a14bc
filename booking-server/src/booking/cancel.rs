//! Session cancellation.
//!
//! A booking session is cancelled as a group: every linked appointment
//! still in the future is soft-deleted, past ones stay untouched.

use chrono_tz::Tz;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::repository::appointment;
use crate::utils::time::{millis_to_local_date, millis_to_minute};
use crate::utils::{AppError, AppResult};
use shared::models::{Appointment, CancelOutcome, CancelPreview};
use shared::util::{format_hhmm, now_millis};

/// Canonicalize the token; garbage never reaches the database.
fn parse_token(token: &str) -> AppResult<String> {
    Uuid::parse_str(token)
        .map(|u| u.to_string())
        .map_err(|_| AppError::session_not_found(token))
}

fn future_rows(rows: &[Appointment], now: i64) -> Vec<&Appointment> {
    rows.iter()
        .filter(|r| !r.is_cancelled_by_client && r.start_time > now)
        .collect()
}

/// What a confirm would cancel, without mutating anything.
///
/// A count of zero with Ok means the session exists but everything in
/// it is already past or cancelled.
pub async fn preview_cancellation(
    pool: &SqlitePool,
    tz: Tz,
    token: &str,
) -> AppResult<CancelPreview> {
    let token = parse_token(token)?;
    let rows = appointment::find_by_session(pool, &token).await?;
    if rows.is_empty() {
        return Err(AppError::session_not_found(&token));
    }

    let future = future_rows(&rows, now_millis());
    let first = future.iter().map(|r| r.start_time).min();
    Ok(CancelPreview {
        cancellable_count: future.len() as u32,
        first_date: first.map(|ms| millis_to_local_date(ms, tz).format("%Y-%m-%d").to_string()),
        first_time: first.map(|ms| format_hhmm(millis_to_minute(ms, tz))),
    })
}

/// Soft-cancel every future appointment of the session.
///
/// Repeat confirms return zero, not an error.
pub async fn confirm_cancellation(pool: &SqlitePool, token: &str) -> AppResult<CancelOutcome> {
    let token = parse_token(token)?;
    let rows = appointment::find_by_session(pool, &token).await?;
    if rows.is_empty() {
        return Err(AppError::session_not_found(&token));
    }

    let cancelled = appointment::cancel_future_by_session(pool, &token, now_millis()).await?;
    if cancelled > 0 {
        tracing::info!(session = %token, count = cancelled, "Booking session cancelled by client");
    }
    Ok(CancelOutcome {
        cancelled_count: cancelled as u32,
    })
}
