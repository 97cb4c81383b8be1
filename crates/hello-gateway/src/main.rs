//! Hello Gateway - Main entry point
//!
//! HTTP host that:
//! - Matches request paths against route templates
//! - Invokes the bound handler with the extracted path parameters and body
//! - Returns the handler's string as the response body

mod config;
mod error;
mod router;
mod routes;

use anyhow::{Context as _, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use csv_handler::{csv_read, csv_write};
use hello_world_handler::hello_world;

use crate::config::AppConfig;
use crate::routes::RouteTable;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub routes: RouteTable,
}

impl AppState {
    /// Bind the greeting handler to every configured hello route and the CSV
    /// handlers to their routes
    pub fn new(config: AppConfig) -> Self {
        let mut routes = RouteTable::new();
        for pattern in &config.hello_routes {
            routes.register(pattern.as_str(), "hello-world", hello_world);
        }
        routes.register_fallible(config.csv_read_route.as_str(), "csv-read", csv_read, "application/json");
        routes.register_fallible(
            config.csv_write_route.as_str(),
            "csv-write",
            csv_write,
            "text/csv; charset=utf-8",
        );
        Self { config, routes }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,hello_gateway=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Hello Gateway");

    let config = AppConfig::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    let state = Arc::new(AppState::new(config));
    for route in state.routes.iter() {
        tracing::info!(pattern = %route.pattern, handler = %route.handler_name, "Route registered");
    }

    let addr = state.config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Gateway listening on {}", addr);

    let app = router::create_gateway_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
