use skinai_launcher::plan::{default_services, sibling_bin_dir};
use skinai_launcher::supervisor::StopReason;
use skinai_launcher::{ServicePorts, Supervisor};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skinai_launcher=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let ports = ServicePorts::allocate()?;
    tracing::info!(
        backend = ports.backend,
        ui = ports.ui,
        admin = ports.admin,
        "Allocated ports"
    );

    let services = default_services(&sibling_bin_dir()?);
    let mut supervisor = Supervisor::new(ports.env_vars());

    if let Err(e) = supervisor.start_all(&services).await {
        tracing::error!(error = %e, "Startup failed");
        supervisor.shutdown().await;
        return Err(e.into());
    }

    tracing::info!(url = %ports.api_url(), "Backend API");
    tracing::info!(url = %format!("http://127.0.0.1:{}", ports.ui), "User dashboard");
    tracing::info!(url = %format!("http://127.0.0.1:{}", ports.admin), "Admin dashboard");

    match supervisor.wait().await {
        StopReason::Interrupted => tracing::info!("Shutting down"),
        StopReason::ChildExited { name, status } => {
            tracing::warn!(service = name, status = ?status, "Service exited, stopping the rest")
        }
    }
    supervisor.shutdown().await;
    Ok(())
}
