//! REST API over a completed KPI run.
//!
//! Provides five GET endpoints:
//! - `/metrics`: headline KPIs, ratings and data-quality warnings
//! - `/breakdown`: consumption by level
//! - `/monthly`: per-month series with optional index range
//! - `/zones`: zone bulk against individual meters, per zone
//! - `/zones/monthly`: the same balance per zone and month

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::calculator::KpiRun;

pub use types::{ErrorResponse, MetricsResponse, MonthlyQuery};

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes and wrapped in `Arc`; handlers only
/// read it.
pub struct AppState {
    /// Month schema version used for the run.
    pub month_schema_version: u32,
    pub run: KpiRun,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(handlers::get_metrics))
        .route("/breakdown", get(handlers::get_breakdown))
        .route("/monthly", get(handlers::get_monthly))
        .route("/zones", get(handlers::get_zones))
        .route("/zones/monthly", get(handlers::get_zone_monthly))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
