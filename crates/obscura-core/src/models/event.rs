//! Inbound event models.
//!
//! The delivery platform posts one event per invocation. The body is either a
//! bare storage-change descriptor or a push envelope whose `message.data`
//! carries the descriptor base64-encoded. Both shapes are accepted; fields the
//! service does not use are parsed and ignored.

use std::collections::HashMap;

use base64::Engine;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// Push-delivery envelope wrapping a message.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message inside a push envelope. `data` is base64-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub publish_time: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Storage-change descriptor as delivered by the platform.
///
/// All fields are optional at the wire level; the object identity is
/// validated when an [`super::ObjectReference`] is constructed. `timestamp`
/// is the origin timestamp used for staleness decisions.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageEvent {
    pub bucket: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub metageneration: Option<String>,
    pub time_created: Option<String>,
    pub timestamp: Option<String>,
}

/// Typed result of probing an event for its origin timestamp.
///
/// `Invalid` and `Absent` both make the event count as originating "now"
/// (age zero), so an unparseable timestamp fails open toward processing.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginTimestamp {
    Present(DateTime<FixedOffset>),
    Invalid(String),
    Absent,
}

impl OriginTimestamp {
    pub fn from_event(event: &StorageEvent) -> Self {
        match &event.timestamp {
            None => OriginTimestamp::Absent,
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(ts) => OriginTimestamp::Present(ts),
                Err(_) => OriginTimestamp::Invalid(raw.clone()),
            },
        }
    }
}

/// One inbound event: the raw payload (kept for traceability) plus the
/// parsed descriptor. Constructed once per invocation from the request body.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    payload: String,
    event: StorageEvent,
}

impl InboundEvent {
    /// Parse a request body: a push envelope (base64 `message.data`) or a
    /// bare descriptor.
    pub fn from_body(body: &[u8]) -> Result<Self, EventError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| EventError::InvalidEncoding(e.to_string()))?;

        if let Ok(envelope) = serde_json::from_str::<PushEnvelope>(text) {
            let payload = match envelope.message.data {
                Some(ref data) => {
                    let decoded = base64::engine::general_purpose::STANDARD
                        .decode(data.as_bytes())
                        .map_err(|e| EventError::InvalidEncoding(e.to_string()))?;
                    String::from_utf8(decoded)
                        .map_err(|e| EventError::InvalidEncoding(e.to_string()))?
                }
                None => String::new(),
            };
            Ok(Self::from_payload(payload))
        } else {
            Ok(Self::from_payload(text.to_string()))
        }
    }

    /// Build an event from an already-decoded payload string. A payload that
    /// is not a JSON object yields an empty descriptor; the missing object
    /// identity is caught by reference validation, not here.
    pub fn from_payload(payload: String) -> Self {
        let event = serde_json::from_str(&payload).unwrap_or_default();
        Self { payload, event }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn storage_event(&self) -> &StorageEvent {
        &self.event
    }

    pub fn origin_timestamp(&self) -> OriginTimestamp {
        OriginTimestamp::from_event(&self.event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_descriptor() {
        let body = br#"{"bucket":"uploads","name":"cat.jpg","contentType":"image/jpeg"}"#;
        let event = InboundEvent::from_body(body).unwrap();
        assert_eq!(event.storage_event().bucket.as_deref(), Some("uploads"));
        assert_eq!(event.storage_event().name.as_deref(), Some("cat.jpg"));
        assert_eq!(
            event.storage_event().content_type.as_deref(),
            Some("image/jpeg")
        );
    }

    #[test]
    fn parses_push_envelope_with_base64_data() {
        let payload = r#"{"bucket":"uploads","name":"dog.png","timestamp":"2024-03-01T10:00:00Z"}"#;
        let data = base64::engine::general_purpose::STANDARD.encode(payload);
        let body = format!(
            r#"{{"message":{{"data":"{}","messageId":"m-1"}},"subscription":"sub"}}"#,
            data
        );

        let event = InboundEvent::from_body(body.as_bytes()).unwrap();
        assert_eq!(event.storage_event().name.as_deref(), Some("dog.png"));
        assert!(matches!(
            event.origin_timestamp(),
            OriginTimestamp::Present(_)
        ));
    }

    #[test]
    fn envelope_without_data_yields_empty_descriptor() {
        let body = br#"{"message":{"messageId":"m-2"}}"#;
        let event = InboundEvent::from_body(body).unwrap();
        assert!(event.storage_event().bucket.is_none());
        assert_eq!(event.origin_timestamp(), OriginTimestamp::Absent);
    }

    #[test]
    fn rejects_invalid_base64_data() {
        let body = br#"{"message":{"data":"%%%not-base64%%%"}}"#;
        assert!(matches!(
            InboundEvent::from_body(body),
            Err(EventError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn non_json_payload_keeps_raw_text() {
        let event = InboundEvent::from_body(b"not json at all").unwrap();
        assert_eq!(event.payload(), "not json at all");
        assert!(event.storage_event().name.is_none());
    }

    #[test]
    fn origin_timestamp_absent_without_field() {
        let event = InboundEvent::from_payload(r#"{"bucket":"b","name":"n"}"#.to_string());
        assert_eq!(event.origin_timestamp(), OriginTimestamp::Absent);
    }

    #[test]
    fn origin_timestamp_invalid_when_unparseable() {
        let event =
            InboundEvent::from_payload(r#"{"timestamp":"yesterday-ish"}"#.to_string());
        assert_eq!(
            event.origin_timestamp(),
            OriginTimestamp::Invalid("yesterday-ish".to_string())
        );
    }

    #[test]
    fn origin_timestamp_preserves_offset() {
        let event = InboundEvent::from_payload(
            r#"{"timestamp":"2024-03-01T12:00:00+02:00"}"#.to_string(),
        );
        match event.origin_timestamp() {
            OriginTimestamp::Present(ts) => {
                assert_eq!(ts.timestamp(), 1_709_287_200);
            }
            other => panic!("expected Present, got {:?}", other),
        }
    }
}
