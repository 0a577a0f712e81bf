//! Configuration module
//!
//! Environment-driven configuration for the moderation service. All settings
//! are read once at process start; nothing here is reloaded at runtime.

use std::env;
use std::path::PathBuf;

use crate::storage_types::StorageBackend;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com";
const DEFAULT_URI_SCHEME: &str = "gs";
const DEFAULT_CONVERT_PATH: &str = "convert";

/// Application configuration (moderation service).
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    /// Destination bucket for remediated (blurred) objects.
    pub blurred_bucket: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<PathBuf>,
    // Classification service configuration
    pub vision_api_key: String,
    pub vision_endpoint: String,
    /// URI scheme used when naming objects to the classification service.
    pub object_uri_scheme: String,
    // Remediation configuration
    pub convert_path: String,
    pub scratch_dir: PathBuf,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let blurred_bucket = env::var("BLURRED_BUCKET_NAME").map_err(|_| {
            anyhow::anyhow!("BLURRED_BUCKET_NAME must be set to the destination bucket")
        })?;

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let config = Config {
            server_port: env::var("PORT")
                .or_else(|_| env::var("SERVER_PORT"))
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            blurred_bucket,
            storage_backend,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_S3_REGION.to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok().map(PathBuf::from),
            vision_api_key: env::var("VISION_API_KEY")
                .map_err(|_| anyhow::anyhow!("VISION_API_KEY must be set"))?,
            vision_endpoint: env::var("VISION_API_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_VISION_ENDPOINT.to_string()),
            object_uri_scheme: env::var("OBJECT_URI_SCHEME")
                .unwrap_or_else(|_| DEFAULT_URI_SCHEME.to_string()),
            convert_path: env::var("CONVERT_PATH")
                .unwrap_or_else(|_| DEFAULT_CONVERT_PATH.to_string()),
            scratch_dir: env::var("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate inter-dependent settings. Called by `from_env`, exposed for
    /// configurations built by hand (tests, embedding).
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.blurred_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("BLURRED_BUCKET_NAME cannot be empty"));
        }

        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND is 'local'"
            ));
        }

        if self.vision_endpoint.trim_end_matches('/').is_empty() {
            return Err(anyhow::anyhow!("VISION_API_ENDPOINT cannot be empty"));
        }

        Ok(())
    }
}
