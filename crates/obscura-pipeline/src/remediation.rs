//! Remediation pipeline: download → transform → upload → cleanup.
//!
//! Stages run strictly in order, and cleanup of transient artifacts runs
//! exactly once per invocation no matter where an earlier stage stopped.
//! Scratch file names are unique per invocation so concurrent invocations
//! sharing the scratch directory cannot collide.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use obscura_core::{ObjectReference, RemediationOutcome};
use obscura_storage::{Storage, StorageError};

use crate::transform::TransformExecutor;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Stage failures that are fatal for the invocation. Transform failures are
/// not here: they produce [`RemediationOutcome::Failed`] instead, because
/// redelivering the same image to the same transform would fail again.
#[derive(Debug, Error)]
pub enum RemediationError {
    #[error("Download failed for {object}: {source}")]
    Download {
        object: String,
        #[source]
        source: StorageError,
    },

    #[error("Upload failed for {object}: {source}")]
    Upload {
        object: String,
        #[source]
        source: StorageError,
    },

    #[error("Scratch file error: {0}")]
    Scratch(#[from] std::io::Error),
}

/// Remediation configuration, established once at process start.
#[derive(Debug, Clone)]
pub struct RemediationConfig {
    /// Bucket remediated objects are published to.
    pub destination_bucket: String,
    /// Directory for transient artifacts, shared across invocations.
    pub scratch_dir: PathBuf,
}

/// Runs the remediation pipeline for one object at a time.
pub struct Remediator {
    storage: Arc<dyn Storage>,
    transform: Arc<dyn TransformExecutor>,
    config: RemediationConfig,
}

impl Remediator {
    pub fn new(
        storage: Arc<dyn Storage>,
        transform: Arc<dyn TransformExecutor>,
        config: RemediationConfig,
    ) -> Self {
        Self {
            storage,
            transform,
            config,
        }
    }

    /// Blur `object` and publish the result to the destination bucket under
    /// the same key.
    ///
    /// `content_type_hint` is the content type carried by the triggering
    /// event; it takes precedence over whatever the download reports, since
    /// not every backend persists content metadata.
    pub async fn remediate(
        &self,
        object: &ObjectReference,
        content_type_hint: Option<&str>,
    ) -> Result<RemediationOutcome, RemediationError> {
        let scratch = ScratchPaths::new(&self.config.scratch_dir, &object.key);
        let result = self.run_stages(object, content_type_hint, &scratch).await;
        scratch.cleanup().await;
        result
    }

    async fn run_stages(
        &self,
        object: &ObjectReference,
        content_type_hint: Option<&str>,
        scratch: &ScratchPaths,
    ) -> Result<RemediationOutcome, RemediationError> {
        // Download
        let downloaded = self
            .storage
            .get(&object.bucket, &object.key)
            .await
            .map_err(|e| {
                tracing::error!(object = %object, error = %e, "Download stage failed");
                RemediationError::Download {
                    object: object.to_string(),
                    source: e,
                }
            })?;

        tokio::fs::create_dir_all(&self.config.scratch_dir).await?;
        tokio::fs::write(&scratch.download, &downloaded.bytes).await?;

        // Transform
        if let Err(e) = self
            .transform
            .transform(&scratch.download, &scratch.blurred)
            .await
        {
            tracing::error!(object = %object, error = %e, "Transform stage failed");
            return Ok(RemediationOutcome::Failed {
                cause: e.to_string(),
            });
        }

        // Upload
        let blurred = tokio::fs::read(&scratch.blurred).await?;
        let content_type = content_type_hint
            .map(str::to_string)
            .or(downloaded.content_type)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        let destination = ObjectReference {
            bucket: self.config.destination_bucket.clone(),
            key: object.key.clone(),
        };

        self.storage
            .put(
                &destination.bucket,
                &destination.key,
                blurred,
                &content_type,
            )
            .await
            .map_err(|e| {
                tracing::error!(object = %object, error = %e, "Upload stage failed");
                RemediationError::Upload {
                    object: destination.to_string(),
                    source: e,
                }
            })?;

        tracing::info!(
            object = %object,
            destination = %destination,
            content_type = %content_type,
            "Blurred image uploaded"
        );

        Ok(RemediationOutcome::Remediated { destination })
    }
}

/// Transient artifact locations for one invocation. The uuid tag keeps
/// concurrent invocations on the same key from colliding.
struct ScratchPaths {
    download: PathBuf,
    blurred: PathBuf,
}

impl ScratchPaths {
    fn new(scratch_dir: &Path, key: &str) -> Self {
        let tag = Uuid::new_v4().simple().to_string();
        let safe_name = key.replace(['/', '\\'], "_");

        Self {
            download: scratch_dir.join(format!("{}-{}", tag, safe_name)),
            blurred: scratch_dir.join(format!("{}-blurred-{}", tag, safe_name)),
        }
    }

    /// Delete both artifacts if present. Failures are logged and never
    /// escalated; a cleanup problem must not override the stage result.
    async fn cleanup(&self) {
        for path in [&self.download, &self.blurred] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to delete transient artifact"
                    );
                }
            }
        }
    }
}
