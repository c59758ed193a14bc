//! Client Model

use serde::{Deserialize, Serialize};

/// Client entity (the person an appointment is for)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Internal stand-in row for desk holds; never notified
    pub is_placeholder: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_placeholder: Option<bool>,
}
