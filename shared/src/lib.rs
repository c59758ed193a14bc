//! Shared types for the booking backend
//!
//! Domain models, payload structs, the unified error system and small
//! utilities used by both the server crate and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
