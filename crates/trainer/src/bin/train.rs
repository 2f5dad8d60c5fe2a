use anyhow::Context;
use skinai_trainer::config::TrainConfig;
use skinai_trainer::export::export_artifact;
use skinai_trainer::features::OnnxBackbone;
use skinai_trainer::train::train_from_dataset;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    skinai_trainer::init_tracing();

    let config = TrainConfig::from_env()?;
    tracing::info!(
        dataset_dir = %config.dataset_dir.display(),
        backbone = %config.backbone_path.display(),
        epochs = config.epochs,
        learning_rate = config.learning_rate,
        batch_size = config.batch_size,
        "Loaded training configuration"
    );

    let backbone = OnnxBackbone::load(&config.backbone_path)
        .with_context(|| format!("Failed to load backbone {}", config.backbone_path.display()))?;

    let (classes, outcome) = train_from_dataset(&backbone, &config)?;
    tracing::info!(best_accuracy = outcome.best_accuracy, "Training finished");

    let paths = export_artifact(&outcome.best_head, &classes, backbone.path(), &config.models_dir)?;
    tracing::info!(model = %paths.model.display(), "Model ready for the API");
    Ok(())
}
