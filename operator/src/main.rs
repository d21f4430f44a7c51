use anyhow::Result;
use minio_operator::{
    charm::MinioCharm,
    http,
    settings::OperatorSettings,
    storage::{self, ModelStore, StorageConfig},
};
use std::sync::Arc;
use tracing::{Level, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()),
        )
        .init();

    let settings = OperatorSettings::from_env()?;
    info!(app = %settings.app_name, "Starting MinIO operator");

    if let StorageConfig::Local { path } = &settings.storage {
        info!("Using storage path: {}", path.display());
        std::fs::create_dir_all(path)?;
    }

    let store = storage::ObjectStoreBackend::from_config(settings.storage.clone())?;
    let store: Arc<dyn ModelStore> = Arc::new(store);
    let charm = Arc::new(MinioCharm::new(
        store,
        settings.app_name.clone(),
        settings.model_name.clone(),
    ));

    http::start_server(charm, settings.bind_address).await?;

    Ok(())
}
