//! 工具模块 - 通用工具函数
//!
//! # 内容
//!
//! - 错误类型 re-export (from shared::error)
//! - [`time`] - 业务时区与分钟坐标转换
//! - [`logger`] - tracing 初始化

pub mod logger;
pub mod time;

// Re-export error types from shared so call sites stay short
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
