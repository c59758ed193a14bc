//! Service Model

use serde::{Deserialize, Serialize};

/// Service entity (haircut, massage, tanning session, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Duration in minutes; services with duration <= 0 are never schedulable
    pub duration_min: i64,
    /// Price in cents
    pub price_cents: i64,
    /// How many clients can run this service at once (e.g. tanning beds).
    /// Stored and surfaced but not consulted by the assignment resolver.
    pub max_concurrent: i64,
    pub is_visible_online: bool,
    pub is_deleted: bool,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Operator IDs able to perform this service (junction table)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub operator_ids: Vec<i64>,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    pub description: Option<String>,
    pub duration_min: i64,
    pub price_cents: i64,
    pub max_concurrent: Option<i64>,
    pub is_visible_online: Option<bool>,
    /// Operator IDs able to perform this service
    pub operator_ids: Option<Vec<i64>>,
}
