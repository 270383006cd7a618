//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::hierarchy::{LevelBreakdown, MonthlyKpiPoint, ZoneBalance, ZoneMonthlyBalance};

use super::AppState;
use super::types::{ErrorResponse, MetricsResponse, MonthlyQuery};

/// `GET /metrics` → 200 + `MetricsResponse` JSON
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let run = &state.run;
    Json(MetricsResponse {
        month_schema_version: state.month_schema_version,
        record_count: run.record_count,
        metrics: run.report.metrics.clone(),
        ratings: run.ratings,
        warnings: run.report.warnings.clone(),
        zones: run.available_zones.clone(),
        meter_types: run.available_types.clone(),
    })
}

/// `GET /breakdown` → 200 + `Vec<LevelBreakdown>` JSON
pub async fn get_breakdown(State(state): State<Arc<AppState>>) -> Json<Vec<LevelBreakdown>> {
    Json(state.run.breakdown.clone())
}

/// Returns the monthly series, optionally restricted to a month index range.
///
/// `GET /monthly` → 200 + `Vec<MonthlyKpiPoint>` JSON
/// `GET /monthly?from=N&to=M` → filtered range (inclusive)
/// `GET /monthly?from=5&to=2` → 400 + `ErrorResponse`
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthlyQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let points: Vec<MonthlyKpiPoint> = state
        .run
        .monthly
        .iter()
        .enumerate()
        .filter(|(i, _)| *i >= from && *i <= to)
        .map(|(_, p)| p.clone())
        .collect();

    Ok(Json(points))
}

/// `GET /zones` → 200 + `Vec<ZoneBalance>` JSON
pub async fn get_zones(State(state): State<Arc<AppState>>) -> Json<Vec<ZoneBalance>> {
    Json(state.run.zones.clone())
}

/// `GET /zones/monthly` → 200 + `Vec<ZoneMonthlyBalance>` JSON
pub async fn get_zone_monthly(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<ZoneMonthlyBalance>> {
    Json(state.run.zone_monthly.clone())
}
