//! Browser dashboards for the SkinAI API.
//!
//! Two small HTML servers: the user-facing upload page and the admin review
//! page. Both talk to the API over HTTP through [`client::ApiClient`]; the
//! admin page also serves stored images straight from the upload directory.

pub mod admin;
pub mod client;
pub mod config;
pub mod error;
pub mod html;
pub mod state;
pub mod user;

use std::net::SocketAddr;

use axum::Router;

/// Install the `tracing` subscriber with a crate-specific default filter.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Bind `addr` and serve `app` until SIGINT or SIGTERM.
pub async fn serve(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    tracing::info!(%addr, "Starting dashboard");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down dashboard");
}
