//! Database Module
//!
//! One SQLite file per tenant under `DATA_DIR`, opened lazily and cached.
//! Handles connection pools and migrations.

pub mod repository;

use dashmap::DashMap;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::utils::AppError;
use shared::error::AppResult;

/// Tenant slug: lowercase alphanumeric plus `-` and `_`
///
/// The slug names a file on disk, so anything else is rejected before it
/// reaches the filesystem.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Per-tenant pool registry — owns one SQLite connection pool per tenant
#[derive(Clone)]
pub struct TenantRegistry {
    data_dir: PathBuf,
    pools: std::sync::Arc<DashMap<String, SqlitePool>>,
}

impl TenantRegistry {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            pools: std::sync::Arc::new(DashMap::new()),
        }
    }

    fn db_path(&self, slug: &str) -> PathBuf {
        self.data_dir.join(format!("{slug}.db"))
    }

    /// Get the pool for an existing tenant, opening it on first use.
    ///
    /// Unknown slug or missing database file maps to tenant-not-found.
    pub async fn pool(&self, slug: &str) -> AppResult<SqlitePool> {
        if !is_valid_slug(slug) {
            return Err(AppError::tenant_not_found(slug));
        }
        if let Some(pool) = self.pools.get(slug) {
            return Ok(pool.clone());
        }

        let path = self.db_path(slug);
        if !path.exists() {
            return Err(AppError::tenant_not_found(slug));
        }

        let pool = open_pool(&path, false).await?;
        // Two tasks may race here; the map keeps whichever lands first
        // and both pools point at the same file.
        self.pools.insert(slug.to_string(), pool.clone());
        Ok(pool)
    }

    /// Create a tenant database (file + schema) and cache its pool.
    ///
    /// Used by seeding tooling and tests; the public API never creates
    /// tenants.
    pub async fn create_tenant(&self, slug: &str) -> AppResult<SqlitePool> {
        if !is_valid_slug(slug) {
            return Err(AppError::validation(format!("Invalid tenant slug: {slug}")));
        }
        if let Some(pool) = self.pools.get(slug) {
            return Ok(pool.clone());
        }
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| AppError::database(format!("Failed to create data dir: {e}")))?;
        let pool = open_pool(&self.db_path(slug), true).await?;
        self.pools.insert(slug.to_string(), pool.clone());
        Ok(pool)
    }

    /// Enumerate tenants by scanning `DATA_DIR` for `<slug>.db` files.
    ///
    /// Used by the reminder scheduler, which must visit every tenant
    /// whether or not a request has opened its pool yet.
    pub fn known_tenants(&self) -> Vec<String> {
        let mut slugs: Vec<String> = std::fs::read_dir(&self.data_dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("db") {
                    return None;
                }
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| is_valid_slug(s))
                    .map(String::from)
            })
            .collect();
        slugs.sort();
        slugs
    }
}

/// Open a SQLite pool with WAL mode and run migrations
async fn open_pool(db_path: &Path, create: bool) -> AppResult<SqlitePool> {
    let path_str = db_path.to_string_lossy();

    // Build connection options: WAL, foreign keys, normal sync
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{path_str}"))
        .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
        .create_if_missing(create)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .pragma("foreign_keys", "ON")
        .optimize_on_close(true, None);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

    // busy_timeout: 写冲突时等待 5s 而非立即失败
    sqlx::query("PRAGMA busy_timeout = 5000;")
        .execute(&pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(&pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;

    tracing::info!(db = %path_str, "Tenant database ready (SQLite WAL, busy_timeout=5000ms)");
    Ok(pool)
}

/// In-memory SQLite pool with the full schema, for repository and
/// service tests. Single connection so every query sees the same db.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}
