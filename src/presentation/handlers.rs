// HTTP request handlers for the local view server
use crate::domain::dashboard::DashboardView;
use crate::presentation::app_state::AppState;
use crate::presentation::chart_style::{ChartStyle, CALL_CHART_STYLE};
use crate::presentation::render::render_dashboard;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/text", get(dashboard_text))
        .route("/dashboard/chart-style", get(chart_style))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest reconciled view
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.current_view())
}

pub async fn dashboard_text(State(state): State<Arc<AppState>>) -> String {
    render_dashboard(&state.current_view())
}

pub async fn chart_style() -> Json<ChartStyle> {
    Json(CALL_CHART_STYLE)
}
