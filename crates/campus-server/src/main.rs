//! campus server — Application entry point.

mod config;

use campus_api::AppState;
use campus_db::DbManager;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("campus=info".parse().unwrap()),
        )
        .json()
        .init();

    info!("Starting campus server...");

    let config = ServerConfig::load();

    let manager = DbManager::connect(&config.db)
        .await
        .expect("failed to connect to SurrealDB");

    campus_db::run_migrations(manager.client())
        .await
        .expect("failed to run migrations");

    let state = AppState::new(manager.client().clone(), config.auth.clone());
    let app = campus_api::router(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {address}: {e}"));
    info!(%address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    info!("campus server stopped.");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
