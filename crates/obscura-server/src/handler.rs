//! Invocation handler: guard → classify → decide → remediate.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use obscura_core::{EventError, InboundEvent, ObjectReference, RemediationOutcome};
use obscura_pipeline::{decide, guard, RemediationError, Remediator, Verdict};
use obscura_vision::{ClassificationError, SafeSearchClassifier};

/// How one invocation ended. Every variant returns normally to the delivery
/// platform (no redelivery); failures that should prompt redelivery are
/// [`HandlerError`]s instead.
#[derive(Debug)]
pub enum Disposition {
    /// Stale event dropped by the guard before any remote call.
    Dropped,
    /// The event lacked a usable object identity; nothing was called.
    Invalid(EventError),
    /// The classifier could not score the object (per-item service error or
    /// empty result); accepted without remediation.
    Unscored,
    /// Classified safe; remediation skipped.
    Safe,
    /// Blurred copy published to the destination.
    Remediated(ObjectReference),
    /// The transform stage failed; transient artifacts were cleaned up.
    RemediationFailed(String),
}

/// Failures fatal for the invocation, surfaced to the platform so it may
/// redeliver. The staleness guard gates the next attempt.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Remediation(#[from] RemediationError),
}

/// Wires the pipeline units together for one event at a time. Holds no
/// mutable state; invocations are independent.
pub struct ModerationHandler {
    classifier: Arc<dyn SafeSearchClassifier>,
    remediator: Remediator,
}

impl ModerationHandler {
    pub fn new(classifier: Arc<dyn SafeSearchClassifier>, remediator: Remediator) -> Self {
        Self {
            classifier,
            remediator,
        }
    }

    pub async fn handle(
        &self,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<Disposition, HandlerError> {
        if !guard::should_process(event, now) {
            return Ok(Disposition::Dropped);
        }

        let object = match ObjectReference::from_event(event.storage_event()) {
            Ok(object) => object,
            Err(e) => {
                tracing::error!(error = %e, payload = %event.payload(), "Malformed storage event");
                return Ok(Disposition::Invalid(e));
            }
        };

        tracing::info!(object = %object, "Analyzing object");

        let result = self.classifier.classify(&object).await?;

        if let Some(error) = result.error {
            tracing::error!(
                object = %object,
                error = %error,
                "Classification service reported an item error"
            );
            return Ok(Disposition::Unscored);
        }

        let annotation = match result.safe_search {
            Some(annotation) => annotation,
            None => {
                tracing::warn!(object = %object, "No safe-search annotation returned, accepting");
                return Ok(Disposition::Unscored);
            }
        };

        match decide(&annotation) {
            Verdict::Accept => {
                tracing::info!(object = %object, "Object classified as OK");
                Ok(Disposition::Safe)
            }
            Verdict::Remediate => {
                tracing::info!(
                    object = %object,
                    adult = ?annotation.adult,
                    violence = ?annotation.violence,
                    "Object classified as inappropriate"
                );

                let hint = event.storage_event().content_type.as_deref();
                match self.remediator.remediate(&object, hint).await? {
                    RemediationOutcome::Remediated { destination } => {
                        Ok(Disposition::Remediated(destination))
                    }
                    RemediationOutcome::Failed { cause } => {
                        Ok(Disposition::RemediationFailed(cause))
                    }
                    // The remediator never skips on its own; Safe covers it.
                    RemediationOutcome::Skipped => Ok(Disposition::Safe),
                }
            }
        }
    }
}
