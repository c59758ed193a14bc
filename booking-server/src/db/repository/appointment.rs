//! Appointment Repository
//!
//! Occupancy rows (bookings, blocks, placeholders). The committer inserts
//! and re-checks overlap inside one transaction, so those functions take a
//! `&mut SqliteConnection` instead of the pool.

use super::RepoResult;
use shared::models::{Appointment, AppointmentCreate};
use sqlx::{SqliteConnection, SqlitePool};

/// Occupying rows whose start falls in `[from_ms, to_ms)`.
///
/// Cancelled rows are excluded; all kinds are included. This feeds the
/// availability index, which treats blocks and placeholders as busy time.
pub async fn find_occupying_in_range(
    pool: &SqlitePool,
    from_ms: i64,
    to_ms: i64,
) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(
        "SELECT id, kind, client_id, operator_id, service_id, start_time, duration_min, note, source, booking_session_id, is_cancelled_by_client, created_at, updated_at \
         FROM appointment \
         WHERE is_cancelled_by_client = 0 AND start_time >= ? AND start_time < ? \
         ORDER BY start_time, id",
    )
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Every row linked to a booking session, cancelled ones included.
///
/// Cancellation must stay idempotent: a second confirm has to find the
/// session and report zero newly cancelled rows, not a missing session.
pub async fn find_by_session(pool: &SqlitePool, session_id: &str) -> RepoResult<Vec<Appointment>> {
    let rows = sqlx::query_as::<_, Appointment>(
        "SELECT id, kind, client_id, operator_id, service_id, start_time, duration_min, note, source, booking_session_id, is_cancelled_by_client, created_at, updated_at \
         FROM appointment \
         WHERE booking_session_id = ? \
         ORDER BY start_time, id",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Insert one appointment row. Runs on a connection so the committer can
/// call it inside its transaction.
pub async fn insert(conn: &mut SqliteConnection, data: &AppointmentCreate) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO appointment (kind, client_id, operator_id, service_id, start_time, duration_min, note, source, booking_session_id, is_cancelled_by_client, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?) RETURNING id",
    )
    .bind(data.kind)
    .bind(data.client_id)
    .bind(data.operator_id)
    .bind(data.service_id)
    .bind(data.start_time)
    .bind(data.duration_min)
    .bind(&data.note)
    .bind(data.source)
    .bind(&data.booking_session_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    Ok(id)
}

/// Occupying rows that overlap `[start_ms, end_ms)` for one operator.
///
/// Counts the operator's own rows plus business-wide blocks (BLOCK rows
/// with NULL operator_id). Run inside the commit transaction this is the
/// authoritative slot-taken check.
pub async fn count_overlapping(
    conn: &mut SqliteConnection,
    operator_id: i64,
    start_ms: i64,
    end_ms: i64,
) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM appointment \
         WHERE is_cancelled_by_client = 0 \
           AND start_time < ? \
           AND start_time + duration_min * 60000 > ? \
           AND (operator_id = ? OR (kind = 'BLOCK' AND operator_id IS NULL))",
    )
    .bind(end_ms)
    .bind(start_ms)
    .bind(operator_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count)
}

/// Soft-cancel every future, not-yet-cancelled row of a session.
///
/// Returns how many rows were newly cancelled. Zero is a valid outcome
/// (repeat confirm, or the whole chain already started).
pub async fn cancel_future_by_session(
    pool: &SqlitePool,
    session_id: &str,
    now_ms: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE appointment SET is_cancelled_by_client = 1, updated_at = ? \
         WHERE booking_session_id = ? AND is_cancelled_by_client = 0 AND start_time > ?",
    )
    .bind(shared::util::now_millis())
    .bind(session_id)
    .bind(now_ms)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Joined row for morning client reminders
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NotifyRow {
    pub client_id: Option<i64>,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_is_placeholder: bool,
    pub operator_id: i64,
    pub operator_name: String,
    pub start_time: i64,
    pub duration_min: i64,
    pub service_name: String,
}

/// Booked, non-cancelled rows in `[from_ms, to_ms)` with client, service
/// and operator names resolved. Used by the reminder scheduler for both
/// the morning client reminders and the evening operator agendas.
pub async fn find_notify_rows(
    pool: &SqlitePool,
    from_ms: i64,
    to_ms: i64,
) -> RepoResult<Vec<NotifyRow>> {
    let rows = sqlx::query_as::<_, NotifyRow>(
        "SELECT a.client_id, COALESCE(c.name, '') AS client_name, c.phone AS client_phone, \
                COALESCE(c.is_placeholder, 1) AS client_is_placeholder, \
                a.operator_id, o.name AS operator_name, \
                a.start_time, a.duration_min, s.name AS service_name \
         FROM appointment a \
         JOIN service s ON s.id = a.service_id \
         JOIN operator o ON o.id = a.operator_id \
         LEFT JOIN client c ON c.id = a.client_id \
         WHERE a.kind = 'BOOKED' AND a.is_cancelled_by_client = 0 \
           AND a.start_time >= ? AND a.start_time < ? \
         ORDER BY a.start_time, a.id",
    )
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Per-operator schedule row for the evening agenda messages.
///
/// Includes personal blocks and placeholders so the agenda shows pauses
/// and holds, not only client bookings. Global blocks have no operator
/// and are left out.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AgendaRow {
    pub operator_id: i64,
    pub kind: shared::models::AppointmentKind,
    pub start_time: i64,
    pub duration_min: i64,
    pub note: Option<String>,
    pub service_name: Option<String>,
}

pub async fn find_agenda_rows(
    pool: &SqlitePool,
    from_ms: i64,
    to_ms: i64,
) -> RepoResult<Vec<AgendaRow>> {
    let rows = sqlx::query_as::<_, AgendaRow>(
        "SELECT a.operator_id, a.kind, a.start_time, a.duration_min, a.note, s.name AS service_name \
         FROM appointment a \
         LEFT JOIN service s ON s.id = a.service_id \
         WHERE a.is_cancelled_by_client = 0 AND a.operator_id IS NOT NULL \
           AND a.start_time >= ? AND a.start_time < ? \
         ORDER BY a.operator_id, a.start_time",
    )
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
