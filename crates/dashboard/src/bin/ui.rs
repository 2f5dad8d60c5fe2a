use std::net::SocketAddr;

use skinai_dashboard::config::DashboardConfig;
use skinai_dashboard::state::DashboardState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    skinai_dashboard::init_tracing("skinai_dashboard=info,tower_http=info");

    let config = DashboardConfig::from_env("UI_PORT");
    tracing::info!(api_url = %config.api_url, port = config.port, "Loaded UI configuration");

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let app = skinai_dashboard::user::router(DashboardState::new(config));
    skinai_dashboard::serve(app, addr).await
}
