//! Domain model for users and their notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Provide explicit mappings between storage rows and response shapes.
//!
//! # Invariants
//! - Every note carries exactly one owner id, fixed at creation.
//! - Timestamps are Unix epoch milliseconds.

pub mod note;
pub mod user;

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to `0` if the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
