use std::sync::Arc;

use obscura_core::Config;
use obscura_pipeline::{ImageMagickBlur, RemediationConfig, Remediator};
use obscura_server::{build_router, telemetry, AppState, ModerationHandler};
use obscura_storage::create_storage;
use obscura_vision::{VisionClient, VisionClientConfig};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry();

    let storage = create_storage(&config).await?;

    let classifier = Arc::new(VisionClient::new(VisionClientConfig {
        endpoint: config.vision_endpoint.clone(),
        api_key: config.vision_api_key.clone(),
        uri_scheme: config.object_uri_scheme.clone(),
    })?);

    let transform = Arc::new(ImageMagickBlur::new(config.convert_path.clone()));

    let remediator = Remediator::new(
        storage,
        transform,
        RemediationConfig {
            destination_bucket: config.blurred_bucket.clone(),
            scratch_dir: config.scratch_dir.clone(),
        },
    );

    let handler = Arc::new(ModerationHandler::new(classifier, remediator));
    let router = build_router(AppState { handler });

    obscura_server::server::start_server(&config, router).await
}
