//! Obscura Core Library
//!
//! This crate provides the domain models, error types, and configuration
//! shared across all Obscura components.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::EventError;
pub use models::{
    InboundEvent, ObjectReference, OriginTimestamp, PushEnvelope, PushMessage, RemediationOutcome,
    StorageEvent,
};
pub use storage_types::StorageBackend;
