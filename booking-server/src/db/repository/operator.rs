//! Operator Repository

use super::{RepoError, RepoResult};
use shared::models::{Operator, OperatorCreate, OperatorKind};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Operator>> {
    let operator = sqlx::query_as::<_, Operator>(
        "SELECT id, name, kind, phone, is_visible, is_deleted, notify_shifts, created_at, updated_at FROM operator WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(operator)
}

/// Operators that participate in scheduling (visible, not deleted),
/// deterministic name order
pub async fn find_schedulable(pool: &SqlitePool) -> RepoResult<Vec<Operator>> {
    let operators = sqlx::query_as::<_, Operator>(
        "SELECT id, name, kind, phone, is_visible, is_deleted, notify_shifts, created_at, updated_at FROM operator WHERE is_visible = 1 AND is_deleted = 0 ORDER BY name COLLATE NOCASE, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(operators)
}

/// Person operators opted in to the next-day agenda, with a phone number
pub async fn find_agenda_recipients(pool: &SqlitePool) -> RepoResult<Vec<Operator>> {
    let operators = sqlx::query_as::<_, Operator>(
        "SELECT id, name, kind, phone, is_visible, is_deleted, notify_shifts, created_at, updated_at FROM operator WHERE kind = 'PERSON' AND notify_shifts = 1 AND is_visible = 1 AND is_deleted = 0 AND phone IS NOT NULL ORDER BY name COLLATE NOCASE, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(operators)
}

/// Insert an operator. Seeding and tests only.
pub async fn create(pool: &SqlitePool, data: OperatorCreate) -> RepoResult<Operator> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO operator (name, kind, phone, is_visible, is_deleted, notify_shifts, created_at, updated_at) VALUES (?, ?, ?, ?, 0, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.kind.unwrap_or(OperatorKind::Person))
    .bind(&data.phone)
    .bind(data.is_visible.unwrap_or(true))
    .bind(data.notify_shifts.unwrap_or(false))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create operator".into()))
}
