//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 简单健康检查 | 无 |
//!
//! # 响应示例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "tenants": 3
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    /// 状态 (healthy)
    status: &'static str,
    /// 版本号
    version: &'static str,
    /// 数据目录中已知的租户数量
    tenants: usize,
}

/// 基础健康检查
///
/// 只确认进程存活并报告租户数量；不触碰任何租户数据库。
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tenants: state.tenants.known_tenants().len(),
    })
}
