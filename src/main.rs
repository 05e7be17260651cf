//! PDF Split Server
//!
//! Splits a multi-page PDF into per-page downloads with timed cleanup.

use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_split_server::config::Config;
use pdf_split_server::routes;
use pdf_split_server::state::AppState;
use pdf_split_server::sweeper::Sweeper;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_split_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("Starting PDF Split Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Storage root: {}", config.storage.root.display());
    tracing::info!(
        "Retention: {}s, sweep interval: {}s",
        config.storage.retention.as_secs(),
        config.storage.sweep_interval.as_secs()
    );

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .expect("SERVER_HOST is not a valid IP address");
    let addr = SocketAddr::from((host, config.server.port));

    // Create application state (ensures the storage root exists)
    let app_state = AppState::new(config.clone())
        .await
        .expect("Failed to initialize application state");

    // Start the expiry sweeper
    let sweeper = Sweeper::new(
        app_state.store().clone(),
        config.storage.retention,
        config.storage.sweep_interval,
    );
    let sweeper_handle = sweeper.start();

    // Build router and start the server with graceful shutdown
    let app = routes::router(app_state);

    tracing::info!("PDF Split Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    sweeper_handle.abort();
    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
