//! Validated object references.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Identity of a stored object: bucket plus key.
///
/// Construction validates that both components are present and non-empty, so
/// downstream components (classifier, remediation) never see a malformed
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectReference {
    pub bucket: String,
    pub key: String,
}

impl ObjectReference {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, EventError> {
        let bucket = bucket.into();
        let key = key.into();

        if bucket.trim().is_empty() {
            return Err(EventError::EmptyField("bucket"));
        }
        if key.trim().is_empty() {
            return Err(EventError::EmptyField("name"));
        }

        Ok(Self { bucket, key })
    }

    /// Extract the object identity from a storage-change descriptor.
    pub fn from_event(event: &super::StorageEvent) -> Result<Self, EventError> {
        let bucket = event
            .bucket
            .as_deref()
            .ok_or(EventError::MissingField("bucket"))?;
        let name = event
            .name
            .as_deref()
            .ok_or(EventError::MissingField("name"))?;
        Self::new(bucket, name)
    }

    /// Canonical URI for this object, e.g. `gs://bucket/key`.
    pub fn uri(&self, scheme: &str) -> String {
        format!("{}://{}/{}", scheme, self.bucket, self.key)
    }
}

impl Display for ObjectReference {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
