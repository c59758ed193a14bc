//! Booking API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::booking;
use crate::core::ServerState;
use crate::db::repository::{business_info, operator, service};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    BookingCatalog, BookingConfirmation, BookingCreate, BusinessSummary, CancelOutcome,
    CancelPreview, CatalogOperator, CatalogService, ServiceRequestItem, SlotListing,
};

/// GET /api/:tenant/booking/services 查询参数
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// 名称搜索词，空则返回全部
    #[serde(default)]
    pub q: String,
}

/// GET /api/:tenant/booking/slots 查询参数
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    /// "YYYY-MM-DD"
    pub date: String,
    /// 请求的服务链，JSON 数组 (URL 编码)
    pub services: String,
    /// 限定单一操作员 (可选)
    pub operator_id: Option<i64>,
}

/// GET /api/:tenant/booking/catalog - 获取预约页目录
///
/// 返回商家信息、可在线预约的服务和可排班的操作员。
pub async fn catalog(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
) -> AppResult<ApiResponse<BookingCatalog>> {
    let pool = state.tenants.pool(&tenant).await?;
    let business = business_info::get(&pool)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BusinessInfoMissing))?;
    let services = service::find_visible_online(&pool).await?;
    let operators = operator::find_schedulable(&pool).await?;

    Ok(ApiResponse::success(BookingCatalog {
        business: BusinessSummary::from(&business),
        services: services.into_iter().map(CatalogService::from).collect(),
        operators: operators.iter().map(CatalogOperator::from).collect(),
    }))
}

/// GET /api/:tenant/booking/services - 按名称搜索可预约服务
pub async fn search_services(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Query(query): Query<SearchQuery>,
) -> AppResult<ApiResponse<Vec<CatalogService>>> {
    let pool = state.tenants.pool(&tenant).await?;
    let q = query.q.trim();
    let services = if q.is_empty() {
        service::find_visible_online(&pool).await?
    } else {
        service::search_visible_online(&pool, q).await?
    };
    Ok(ApiResponse::success(
        services.into_iter().map(CatalogService::from).collect(),
    ))
}

/// GET /api/:tenant/booking/slots - 查询某日可预约的起始时间
pub async fn slots(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<ApiResponse<SlotListing>> {
    let pool = state.tenants.pool(&tenant).await?;
    let items: Vec<ServiceRequestItem> = serde_json::from_str(&query.services)
        .map_err(|e| AppError::validation(format!("Invalid services parameter: {e}")))?;
    let listing = booking::list_available_slots(
        &pool,
        state.config.timezone,
        &query.date,
        &items,
        query.operator_id,
    )
    .await?;
    Ok(ApiResponse::success(listing))
}

/// POST /api/:tenant/booking - 提交预约
///
/// 确认邮件在后台发送，不阻塞也不影响响应。
pub async fn commit(
    State(state): State<ServerState>,
    Path(tenant): Path<String>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<ApiResponse<BookingConfirmation>> {
    let pool = state.tenants.pool(&tenant).await?;
    let confirmation = booking::commit_booking(&pool, state.config.timezone, &payload).await?;
    tracing::info!(
        tenant = %tenant,
        session = %confirmation.booking_session_id,
        appointments = confirmation.appointments.len(),
        "Booking committed"
    );

    let notifier = state.notifier.clone();
    let email = payload.client.email.clone();
    let sent = confirmation.clone();
    tokio::spawn(async move {
        let business_name = business_info::get(&pool)
            .await
            .ok()
            .flatten()
            .map(|b| b.name)
            .unwrap_or_default();
        booking::send_confirmation(
            notifier.as_ref(),
            &tenant,
            &business_name,
            email.as_deref(),
            &sent,
        )
        .await;
    });

    Ok(ApiResponse::success(confirmation))
}

/// GET /api/:tenant/booking/cancel/:token - 预览取消
pub async fn cancel_preview(
    State(state): State<ServerState>,
    Path((tenant, token)): Path<(String, String)>,
) -> AppResult<ApiResponse<CancelPreview>> {
    let pool = state.tenants.pool(&tenant).await?;
    let preview = booking::preview_cancellation(&pool, state.config.timezone, &token).await?;
    Ok(ApiResponse::success(preview))
}

/// POST /api/:tenant/booking/cancel/:token - 确认取消
pub async fn cancel_confirm(
    State(state): State<ServerState>,
    Path((tenant, token)): Path<(String, String)>,
) -> AppResult<ApiResponse<CancelOutcome>> {
    let pool = state.tenants.pool(&tenant).await?;
    let outcome = booking::confirm_cancellation(&pool, &token).await?;
    Ok(ApiResponse::success(outcome))
}
