//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{ClockTime, DayType};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/trains", get(list_trains))
        .route("/trains/count", get(train_count))
        .route("/interval", get(interval))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// All stations in physical order.
async fn list_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    Json(StationsResponse {
        stations: state.table.stations().to_vec(),
    })
}

/// Latest enriched train positions.
async fn list_trains(State(state): State<AppState>) -> Result<Json<TrainsResponse>, AppError> {
    let snapshot = state
        .snapshots
        .load()
        .await
        .ok_or_else(AppError::no_snapshot)?;

    let stale = snapshot.is_stale(Local::now(), state.stale_after);
    Ok(Json(TrainsResponse::from_snapshot(
        &snapshot,
        &state.table,
        stale,
    )))
}

/// Number of trains in the latest snapshot.
async fn train_count(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let snapshot = state
        .snapshots
        .load()
        .await
        .ok_or_else(AppError::no_snapshot)?;

    Ok(Json(CountResponse {
        count: snapshot.train_count(),
    }))
}

/// Scheduled interval for a clock time and day-type.
async fn interval(
    State(state): State<AppState>,
    Query(req): Query<IntervalRequest>,
) -> Result<Json<IntervalResponse>, AppError> {
    let now = Local::now();

    let day_type = req
        .weekend
        .map(DayType::from_weekend_flag)
        .unwrap_or_else(|| DayType::for_date(now.date_naive()));

    let (time, interval_minutes) = match req.time.as_deref() {
        Some(t) => {
            let minutes = state
                .schedule
                .interval_minutes_str(t, day_type)
                .map_err(|e| AppError::BadRequest {
                    message: format!("Invalid time {t:?}: {e}"),
                })?;
            (format!("{:0>4}", t.trim()), minutes)
        }
        None => {
            let now_time = ClockTime::from(now.time());
            (
                format!("{:04}", now_time.hhmm()),
                state.schedule.interval_for(now_time, day_type),
            )
        }
    };

    Ok(Json(IntervalResponse {
        time,
        day_type,
        interval_minutes,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unavailable { message: String },
}

impl AppError {
    fn no_snapshot() -> Self {
        AppError::Unavailable {
            message: "No train data yet: the feed has not been polled successfully".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        warn!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
