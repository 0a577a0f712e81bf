pub mod event;
pub mod object;
pub mod outcome;

pub use event::{InboundEvent, OriginTimestamp, PushEnvelope, PushMessage, StorageEvent};
pub use object::ObjectReference;
pub use outcome::RemediationOutcome;
