//! booking-server — Multi-tenant salon booking backend
//!
//! Long-running service that:
//! - Serves the public booking API (catalog, slots, commit, cancel)
//! - Keeps one SQLite database per tenant under DATA_DIR
//! - Runs the daily reminder/agenda scheduler across all tenants

use booking_server::{Config, ReminderScheduler, ServerState};
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    booking_server::init_logger();

    let config = Config::from_env();
    tracing::info!(
        "Starting booking-server (env: {}, tz: {})",
        config.environment,
        config.timezone
    );

    // Initialize application state
    let state = ServerState::initialize(config)?;

    // Background reminder scheduler, cancelled on shutdown
    let shutdown = CancellationToken::new();
    if state.config.reminders_enabled {
        let scheduler = ReminderScheduler::new(state.clone(), shutdown.clone());
        tokio::spawn(scheduler.run());
    } else {
        tracing::info!("Reminder scheduler disabled by configuration");
    }

    // Build router and start HTTP server
    let app = booking_server::api::create_router(state.clone());
    let addr = format!("0.0.0.0:{}", state.config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("booking-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown().await;
            tracing::info!("Shutdown signal received, draining");
            shutdown.cancel();
        })
        .await?;

    Ok(())
}

/// Resolve on SIGTERM or ctrl-c
async fn wait_for_shutdown() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
}
