//! Service Repository

use super::{RepoError, RepoResult};
use shared::models::{Service, ServiceCreate};
use sqlx::SqlitePool;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Service>> {
    let service = sqlx::query_as::<_, Service>(
        "SELECT id, name, description, duration_min, price_cents, max_concurrent, is_visible_online, is_deleted, created_at, updated_at FROM service WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match service {
        Some(mut s) => {
            s.operator_ids = operator_ids_for(pool, s.id).await?;
            Ok(Some(s))
        }
        None => Ok(None),
    }
}

/// Services bookable from the web (visible online, not deleted),
/// capability relation loaded, ordered by name
pub async fn find_visible_online(pool: &SqlitePool) -> RepoResult<Vec<Service>> {
    let mut services = sqlx::query_as::<_, Service>(
        "SELECT id, name, description, duration_min, price_cents, max_concurrent, is_visible_online, is_deleted, created_at, updated_at FROM service WHERE is_visible_online = 1 AND is_deleted = 0 ORDER BY name COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;

    for service in &mut services {
        service.operator_ids = operator_ids_for(pool, service.id).await?;
    }
    Ok(services)
}

/// Name search over web-bookable services, capability relation loaded
pub async fn search_visible_online(pool: &SqlitePool, q: &str) -> RepoResult<Vec<Service>> {
    let pattern = format!("%{}%", q.replace('%', "").replace('_', ""));
    let mut services = sqlx::query_as::<_, Service>(
        "SELECT id, name, description, duration_min, price_cents, max_concurrent, is_visible_online, is_deleted, created_at, updated_at FROM service WHERE is_visible_online = 1 AND is_deleted = 0 AND name LIKE ? ORDER BY name COLLATE NOCASE",
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    for service in &mut services {
        service.operator_ids = operator_ids_for(pool, service.id).await?;
    }
    Ok(services)
}

/// Operator IDs able to perform one service, name order
pub async fn operator_ids_for(pool: &SqlitePool, service_id: i64) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT so.operator_id FROM service_operator so JOIN operator o ON o.id = so.operator_id WHERE so.service_id = ? ORDER BY o.name COLLATE NOCASE, o.id",
    )
    .bind(service_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Insert a service plus its capability rows. Seeding and tests only.
pub async fn create(pool: &SqlitePool, data: ServiceCreate) -> RepoResult<Service> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO service (name, description, duration_min, price_cents, max_concurrent, is_visible_online, is_deleted, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.duration_min)
    .bind(data.price_cents)
    .bind(data.max_concurrent.unwrap_or(1))
    .bind(data.is_visible_online.unwrap_or(true))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    for operator_id in data.operator_ids.unwrap_or_default() {
        sqlx::query("INSERT OR IGNORE INTO service_operator (service_id, operator_id) VALUES (?, ?)")
            .bind(id)
            .bind(operator_id)
            .execute(pool)
            .await?;
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create service".into()))
}
