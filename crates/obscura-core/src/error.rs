//! Event-level error types.
//!
//! These cover failures that occur before any remote call is made: a
//! delivery payload that cannot be decoded, or a storage-change descriptor
//! missing the fields that identify the object.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Malformed storage event: missing {0}")]
    MissingField(&'static str),

    #[error("Malformed storage event: empty {0}")]
    EmptyField(&'static str),

    #[error("Invalid message data encoding: {0}")]
    InvalidEncoding(String),
}
