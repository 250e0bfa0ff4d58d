use tracing::info;
use webhook_inspector::{
    config::Config, services::seed_service::SeedService, store, utils::logging::init_tracing,
};

/// Replaces every stored webhook with `SEED_COUNT` synthetic payment events.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);

    let store = store::connect(&config).await?;
    let report = SeedService::new(store, config.capture_path.clone())
        .reseed(config.seed_count)
        .await?;

    info!(
        cleared = report.cleared,
        inserted = report.inserted,
        "Seed completed"
    );
    for (event_type, count) in &report.distribution {
        info!("  {:<40} {}", event_type, count);
    }

    Ok(())
}
