//! Obscura Storage Library
//!
//! Object-store abstraction and backends for the moderation service. The
//! [`Storage`] trait addresses objects by bucket and key: one invocation
//! reads from the source bucket named in the event and writes to the
//! configured destination bucket.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStore;
pub use obscura_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Store;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
