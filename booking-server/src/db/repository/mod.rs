//! Repository Module
//!
//! Free async functions over a tenant's `SqlitePool`. All queries are
//! runtime-checked (`query_as` + `bind`) so the build needs no database.

pub mod appointment;
pub mod business_info;
pub mod client;
pub mod operator;
pub mod service;
pub mod shift;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::ValidationFailed, msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
