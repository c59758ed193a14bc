//! Client Repository

use super::{RepoError, RepoResult};
use shared::models::{Client, ClientContact};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(
        "SELECT id, name, phone, email, is_placeholder, created_at, updated_at FROM client WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(client)
}

/// Match an incoming web booking to an existing client, or create one.
///
/// Phone is the primary key for matching; email is the fallback.
/// Placeholder rows never match real contact info.
pub async fn find_or_create(pool: &SqlitePool, contact: &ClientContact) -> RepoResult<Client> {
    if let Some(phone) = contact.phone.as_deref().filter(|p| !p.trim().is_empty()) {
        let existing = sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, is_placeholder, created_at, updated_at FROM client WHERE phone = ? AND is_placeholder = 0 LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(pool)
        .await?;
        if let Some(client) = existing {
            return Ok(client);
        }
    }

    if let Some(email) = contact.email.as_deref().filter(|e| !e.trim().is_empty()) {
        let existing = sqlx::query_as::<_, Client>(
            "SELECT id, name, phone, email, is_placeholder, created_at, updated_at FROM client WHERE email = ? AND is_placeholder = 0 LIMIT 1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        if let Some(client) = existing {
            return Ok(client);
        }
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO client (name, phone, email, is_placeholder, created_at, updated_at) VALUES (?, ?, ?, 0, ?, ?) RETURNING id",
    )
    .bind(contact.name.trim())
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create client".into()))
}
