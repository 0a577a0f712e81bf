//! Classification result types.

use serde::Deserialize;
use thiserror::Error;

/// Ordinal likelihood scale reported per category.
///
/// The order of the variants is the order of the scale; `VeryLikely` is the
/// definite-positive level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

/// Per-category safe-search likelihoods for one image.
///
/// Categories the decision engine does not read (spoof, medical, racy) are
/// parsed anyway; they appear in logs for auditability.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SafeSearchAnnotation {
    pub adult: Likelihood,
    pub spoof: Likelihood,
    pub medical: Likelihood,
    pub violence: Likelihood,
    pub racy: Likelihood,
}

/// Error the service reports for a single item inside an otherwise
/// successful response. Terminal for that object; never retried here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceItemError {
    pub code: Option<i32>,
    pub message: Option<String>,
}

impl std::fmt::Display for ServiceItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "code={} message={}",
            self.code.unwrap_or_default(),
            self.message.as_deref().unwrap_or("<none>")
        )
    }
}

/// Classification of one object: scores, a per-item service error, or
/// neither (the service returned an empty response list).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationResult {
    pub safe_search: Option<SafeSearchAnnotation>,
    pub error: Option<ServiceItemError>,
}

/// Failures completing the remote classification call. Fatal for the
/// invocation; redelivery is the delivery platform's concern.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("Failed to send request to classification service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classification service returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse classification response: {0}")]
    InvalidResponse(String),
}
