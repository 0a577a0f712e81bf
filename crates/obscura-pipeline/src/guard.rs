//! Staleness guard.
//!
//! The delivery platform redelivers events on timeout or crash. Without this
//! guard, a redelivery arriving long after the fact would re-run expensive
//! work for an event whose relevance has expired. The guard holds no state
//! across invocations: it filters stale events, it cannot detect duplicates
//! inside the window.

use chrono::{DateTime, Utc};

use obscura_core::{InboundEvent, OriginTimestamp};

/// Maximum age in milliseconds an event may have before it is dropped.
pub const MAX_EVENT_AGE_MS: i64 = 10_000;

/// Age of an event relative to `now`, in milliseconds.
///
/// An absent or unparseable origin timestamp counts as originating "now"
/// (age zero), so the guard fails open toward processing. A negative age
/// (origin in the future, clock skew) is fresh, not an error.
pub fn event_age_ms(origin: &OriginTimestamp, now: DateTime<Utc>) -> i64 {
    match origin {
        OriginTimestamp::Present(ts) => (now - ts.with_timezone(&Utc)).num_milliseconds(),
        OriginTimestamp::Invalid(raw) => {
            tracing::warn!(timestamp = %raw, "Unparseable origin timestamp, treating event as fresh");
            0
        }
        OriginTimestamp::Absent => 0,
    }
}

/// Decide whether `event` should be processed at `now`.
///
/// The age boundary is inclusive: an event exactly `MAX_EVENT_AGE_MS` old
/// still processes.
pub fn should_process(event: &InboundEvent, now: DateTime<Utc>) -> bool {
    let age_ms = event_age_ms(&event.origin_timestamp(), now);

    if age_ms > MAX_EVENT_AGE_MS {
        tracing::info!(age_ms, payload = %event.payload(), "Dropping stale event");
        false
    } else {
        tracing::info!(age_ms, payload = %event.payload(), "Processing event");
        true
    }
}
