use std::net::SocketAddr;
use std::sync::Arc;

use skinai_core::paths::ServicePaths;
use skinai_model::{ArtifactPaths, Classifier, SkinClassifier};

use skinai_api::config::ServerConfig;
use skinai_api::router::build_app_router;
use skinai_api::state::AppState;
use skinai_api::storage::UploadStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let log_file = ServerConfig::log_file_from_env(&ServicePaths::from_env());
    skinai_api::logging::init(log_file.as_deref());

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        base_dir = %config.paths.base_dir.display(),
        database_url = %config.paths.database_url,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = skinai_db::create_pool(&config.paths.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!("Database connection pool created");

    skinai_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Classifier ---
    let artifacts = ArtifactPaths::best(&config.paths.models_dir);
    let classifier =
        SkinClassifier::load(&artifacts).expect("Failed to load classifier artifact");
    tracing::info!(
        model_loaded = classifier.model_loaded(),
        labels = classifier.labels().len(),
        "Classifier ready"
    );

    // --- Uploads ---
    let uploads = UploadStore::new(config.paths.upload_dir.clone());
    uploads
        .ensure_dir()
        .await
        .expect("Failed to create upload directory");

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        classifier: Arc::new(classifier),
        uploads: Arc::new(uploads),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
