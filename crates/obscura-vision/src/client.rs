//! Safe-search classification client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use obscura_core::ObjectReference;

use crate::types::{
    ClassificationError, ClassificationResult, SafeSearchAnnotation, ServiceItemError,
};

/// Seam for the classification call; the production implementation is
/// [`VisionClient`], tests substitute their own.
#[async_trait]
pub trait SafeSearchClassifier: Send + Sync {
    /// Classify one object. One call per event; no batching.
    async fn classify(
        &self,
        object: &ObjectReference,
    ) -> Result<ClassificationResult, ClassificationError>;
}

/// Vision client configuration
#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    /// Base URL of the annotation endpoint (configurable so tests can point
    /// at a local mock server).
    pub endpoint: String,
    pub api_key: String,
    /// URI scheme used when naming objects, e.g. `gs`.
    pub uri_scheme: String,
}

/// HTTP client for a Vision-style `images:annotate` endpoint.
pub struct VisionClient {
    http_client: reqwest::Client,
    config: VisionClientConfig,
}

impl VisionClient {
    pub fn new(config: VisionClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client for the classification service")?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl SafeSearchClassifier for VisionClient {
    async fn classify(
        &self,
        object: &ObjectReference,
    ) -> Result<ClassificationResult, ClassificationError> {
        let uri = object.uri(&self.config.uri_scheme);
        let url = format!(
            "{}/v1/images:annotate?key={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_key
        );

        let request_body = json!({
            "requests": [{
                "image": {
                    "source": { "imageUri": uri }
                },
                "features": [{ "type": "SAFE_SEARCH_DETECTION" }]
            }]
        });

        tracing::info!(object = %object, "Requesting safe-search annotation");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassificationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let annotate_response: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::InvalidResponse(e.to_string()))?;

        let item = annotate_response
            .responses
            .unwrap_or_default()
            .into_iter()
            .next();

        match item {
            Some(item) => Ok(ClassificationResult {
                safe_search: item.safe_search_annotation,
                error: item.error,
            }),
            None => {
                tracing::warn!(object = %object, "Classification response contained no results");
                Ok(ClassificationResult::default())
            }
        }
    }
}

// Wire types for the annotation response
#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    responses: Option<Vec<AnnotateItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateItem {
    safe_search_annotation: Option<SafeSearchAnnotation>,
    error: Option<ServiceItemError>,
}
