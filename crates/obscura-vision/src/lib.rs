//! Obscura Vision Library
//!
//! Safe-search classification client. Builds one `images:annotate` request
//! per object, naming the object by its canonical URI and requesting a single
//! capability (safe-search detection), and maps the response into typed
//! per-category likelihoods.

pub mod client;
pub mod types;

// Re-export commonly used types
pub use client::{SafeSearchClassifier, VisionClient, VisionClientConfig};
pub use types::{
    ClassificationError, ClassificationResult, Likelihood, SafeSearchAnnotation, ServiceItemError,
};
