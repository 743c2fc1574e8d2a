// Main entry point - Dependency injection, session startup and the view server
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use crate::application::session::DashboardSession;
use crate::domain::dashboard::DashboardView;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_feed::HttpCallFeed;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::router;
use crate::presentation::render::render_dashboard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("call_dashboard=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create feed (infrastructure layer)
    let feed = Arc::new(
        HttpCallFeed::new(&config.server.base_url, config.server.request_timeout())
            .context("Failed to build HTTP client")?,
    );

    // Start session (application layer)
    let session = DashboardSession::start(
        feed,
        config.stream.reconnect_delay(),
        config.stream.channel_capacity,
    );

    if config.view.console {
        tokio::spawn(print_redraws(session.views()));
    }

    // Build router (presentation layer)
    let state = Arc::new(AppState {
        views: session.views(),
    });
    let app = router(state);

    let addr: SocketAddr = config
        .view
        .bind
        .parse()
        .with_context(|| format!("Invalid view.bind address {}", config.view.bind))?;
    tracing::info!(
        %addr,
        harness = %config.server.base_url,
        "Starting call-dashboard view server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(state) = session.teardown().await {
        let chart = state.chart();
        tracing::info!(
            snapshots = state.view().snapshots_applied,
            chart_points = chart.len(),
            chart_capacity = chart.capacity(),
            "Dashboard session closed"
        );
        if let Some(latest) = chart.latest() {
            tracing::info!(label = %latest.label, count = latest.value, "Last charted point");
        }
    }

    Ok(())
}

async fn print_redraws(views: watch::Receiver<DashboardView>) {
    let mut redraws = WatchStream::from_changes(views);
    while let Some(view) = redraws.next().await {
        println!("{}", render_dashboard(&view));
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
