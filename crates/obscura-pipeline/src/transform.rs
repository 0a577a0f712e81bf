//! Transform executor abstraction and the ImageMagick implementation.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Blur intensity passed to the external transform.
const BLUR_INTENSITY: &str = "0x8";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to run transform process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Transform process exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("Transform produced no output at {}", .0.display())]
    MissingOutput(PathBuf),
}

/// Seam for the external image transform. The pipeline only requires that a
/// transformed artifact exists at `dest` on success.
#[async_trait]
pub trait TransformExecutor: Send + Sync {
    async fn transform(&self, source: &Path, dest: &Path) -> Result<(), TransformError>;
}

/// Blurs an image by invoking the ImageMagick `convert` binary as a blocking
/// external process: `convert <source> -blur 0x8 <dest>`.
pub struct ImageMagickBlur {
    convert_path: String,
}

impl ImageMagickBlur {
    pub fn new(convert_path: String) -> Self {
        Self { convert_path }
    }
}

#[async_trait]
impl TransformExecutor for ImageMagickBlur {
    async fn transform(&self, source: &Path, dest: &Path) -> Result<(), TransformError> {
        let output = Command::new(&self.convert_path)
            .arg(source)
            .arg("-blur")
            .arg(BLUR_INTENSITY)
            .arg(dest)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(TransformError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(TransformError::MissingOutput(dest.to_path_buf()));
        }

        tracing::info!(
            source = %source.display(),
            dest = %dest.display(),
            "Transform completed"
        );

        Ok(())
    }
}
