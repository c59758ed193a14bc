//! Booking API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/{tenant}/booking", booking_routes())
}

fn booking_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::commit))
        .route("/catalog", get(handler::catalog))
        .route("/services", get(handler::search_services))
        .route("/slots", get(handler::slots))
        .route(
            "/cancel/{token}",
            get(handler::cancel_preview).post(handler::cancel_confirm),
        )
}
