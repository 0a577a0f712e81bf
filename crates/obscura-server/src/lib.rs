//! Obscura Server
//!
//! Push-delivery endpoint for the moderation pipeline. One event per
//! invocation: the guard decides whether the event is still worth
//! processing, the classifier scores the object, and flagged objects are
//! blurred and re-published.

pub mod handler;
pub mod routes;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use handler::{Disposition, HandlerError, ModerationHandler};
pub use routes::{build_router, AppState};
