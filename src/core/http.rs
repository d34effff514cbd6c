//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::db::{HistoryStore, IndicatorStore};
use crate::error::StoreError;
use crate::metrics::Metrics;
use crate::models::{HistoryPoint, Indicator};

const DEFAULT_HISTORY_DAYS: i64 = 30;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub indicators: Arc<dyn IndicatorStore>,
    pub history: Arc<dyn HistoryStore>,
}

impl AppState {
    pub fn new(
        metrics: Arc<Metrics>,
        indicators: Arc<dyn IndicatorStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            health: Arc::new(RwLock::new(HealthStatus::default())),
            metrics,
            start_time: Arc::new(Instant::now()),
            indicators,
            history,
        }
    }
}

/// Health as seen by the last update cycle run in this process
#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub last_error: Option<String>,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            last_error: None,
        }
    }
}

impl HealthStatus {
    pub fn record_success(&mut self) {
        self.status = "healthy".to_string();
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: impl ToString) {
        self.status = "degraded".to_string();
        self.last_error = Some(error.to_string());
    }
}

/// Store failures surface as 500 with a JSON message
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Store request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": self.0.to_string() })),
        )
            .into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let mut body = json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "indicator-monitor"
    });
    if let Some(error) = &health.last_error {
        body["last_error"] = json!(error);
    }
    Ok(Json(body))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    days: Option<i64>,
}

/// All indicators ordered by id
async fn list_indicators(State(state): State<AppState>) -> Result<Json<Vec<Indicator>>, ApiError> {
    Ok(Json(state.indicators.find_all().await?))
}

async fn triggered_indicators(
    State(state): State<AppState>,
) -> Result<Json<Vec<Indicator>>, ApiError> {
    Ok(Json(state.indicators.find_triggered().await?))
}

/// History for the last `days` (default 30), newest first
async fn indicator_history(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryPoint>>, ApiError> {
    let days = params.days.filter(|d| *d > 0).unwrap_or(DEFAULT_HISTORY_DAYS);
    let since = Utc::now() - Duration::days(days);
    Ok(Json(state.history.find_since(id, since).await?))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/indicators", get(list_indicators))
        .route("/api/indicators/triggered", get(triggered_indicators))
        .route("/api/indicators/{id}/history", get(indicator_history))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
