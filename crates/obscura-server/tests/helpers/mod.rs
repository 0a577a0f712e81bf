//! Test helpers: in-memory seams and a handler builder for integration
//! tests.
//!
//! Run from workspace root: `cargo test -p obscura-server`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use obscura_core::{ObjectReference, StorageBackend};
use obscura_pipeline::{RemediationConfig, Remediator, TransformError, TransformExecutor};
use obscura_server::ModerationHandler;
use obscura_storage::{Storage, StorageError, StorageResult, StoredObject};
use obscura_vision::{
    ClassificationError, ClassificationResult, Likelihood, SafeSearchAnnotation,
    SafeSearchClassifier, ServiceItemError,
};

/// In-memory storage keyed by (bucket, key), counting calls so tests can
/// assert the store was never touched.
pub struct MemoryStorage {
    objects: Mutex<HashMap<(String, String), (Vec<u8>, Option<String>)>>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn set_object(&self, bucket: &str, key: &str, data: Vec<u8>, content_type: Option<&str>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data, content_type.map(String::from)),
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<(Vec<u8>, Option<String>)> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst) + self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .map(|(bytes, content_type)| StoredObject {
                bytes,
                content_type,
            })
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            (data, Some(content_type.to_string())),
        );
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

/// Transform that "blurs" by reversing the bytes.
pub struct ReverseTransform;

#[async_trait]
impl TransformExecutor for ReverseTransform {
    async fn transform(&self, source: &Path, dest: &Path) -> Result<(), TransformError> {
        let mut data = tokio::fs::read(source).await?;
        data.reverse();
        tokio::fs::write(dest, data).await?;
        Ok(())
    }
}

/// Transform that always fails without producing an output artifact.
pub struct BrokenTransform;

#[async_trait]
impl TransformExecutor for BrokenTransform {
    async fn transform(&self, _source: &Path, dest: &Path) -> Result<(), TransformError> {
        Err(TransformError::MissingOutput(dest.to_path_buf()))
    }
}

/// Classifier returning a canned result, counting calls.
pub struct StubClassifier {
    response: ClassificationResult,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn scored(adult: Likelihood, violence: Likelihood) -> Self {
        Self {
            response: ClassificationResult {
                safe_search: Some(SafeSearchAnnotation {
                    adult,
                    violence,
                    ..Default::default()
                }),
                error: None,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            response: ClassificationResult::default(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn item_error(code: i32, message: &str) -> Self {
        Self {
            response: ClassificationResult {
                safe_search: None,
                error: Some(ServiceItemError {
                    code: Some(code),
                    message: Some(message.to_string()),
                }),
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SafeSearchClassifier for StubClassifier {
    async fn classify(
        &self,
        _object: &ObjectReference,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Classifier whose remote endpoint is down.
pub struct UnavailableClassifier;

#[async_trait]
impl SafeSearchClassifier for UnavailableClassifier {
    async fn classify(
        &self,
        _object: &ObjectReference,
    ) -> Result<ClassificationResult, ClassificationError> {
        Err(ClassificationError::Http {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }
}

pub const DESTINATION_BUCKET: &str = "blurred";

/// Build a handler over the given seams with the standard test destination
/// bucket and scratch directory.
pub fn build_handler(
    classifier: Arc<dyn SafeSearchClassifier>,
    storage: Arc<MemoryStorage>,
    transform: Arc<dyn TransformExecutor>,
    scratch_dir: &Path,
) -> ModerationHandler {
    let remediator = Remediator::new(
        storage,
        transform,
        RemediationConfig {
            destination_bucket: DESTINATION_BUCKET.to_string(),
            scratch_dir: scratch_dir.to_path_buf(),
        },
    );
    ModerationHandler::new(classifier, remediator)
}
