//! Data models
//!
//! Shared between booking-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod appointment;
pub mod booking;
pub mod business_info;
pub mod client;
pub mod operator;
pub mod service;
pub mod shift;

// Re-exports
pub use appointment::*;
pub use booking::*;
pub use business_info::*;
pub use client::*;
pub use operator::*;
pub use service::*;
pub use shift::*;
