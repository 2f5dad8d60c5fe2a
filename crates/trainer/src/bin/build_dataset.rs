use anyhow::Context;
use skinai_trainer::config::DatasetConfig;
use skinai_trainer::dataset::build_dataset;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    skinai_trainer::init_tracing();

    let config = DatasetConfig::from_env()?;
    tracing::info!(
        database_url = %config.paths.database_url,
        dataset_dir = %config.paths.dataset_dir.display(),
        "Loaded dataset configuration"
    );

    let pool = skinai_db::create_pool(&config.paths.database_url)
        .await
        .context("Failed to open database")?;
    skinai_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let summary = build_dataset(&pool, &config).await?;
    tracing::info!(
        train = summary.train,
        val = summary.val,
        labels = summary.per_label.len(),
        "Dataset written"
    );

    pool.close().await;
    Ok(())
}
