//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`booking`] - 在线预约接口 (目录、搜索、时段、提交、取消)
//!
//! 所有预约路由挂在 `/api/{tenant}/booking` 下；租户 slug 解析由
//! handler 通过 [`crate::db::TenantRegistry`] 完成，未知租户统一返回
//! tenant-not-found。

pub mod booking;
pub mod health;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Create the combined router
pub fn create_router(state: ServerState) -> Router {
    Router::new()
        // Booking API - public route, tenant-scoped
        .merge(booking::router())
        // Health API - public route
        .merge(health::router())
        // CORS - the booking widget is embedded on customer sites
        .layer(CorsLayer::permissive())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
