//! Shared result of the background version check.
//!
//! One [`UpdateState`] is created by the host program, wrapped in an `Arc`,
//! and handed to both [`UpdateChecker::check_update`] and
//! [`notify_updates`]. The checker task is the only writer; it publishes
//! at most once. Readers never block: before the publish they see
//! "not ready", after it they see the complete payload.
//!
//! [`UpdateChecker::check_update`]: super::UpdateChecker::check_update
//! [`notify_updates`]: super::notify_updates

use super::response::UpdateResponse;
use std::sync::OnceLock;

/// Single-writer, multi-reader holder of the check result.
#[derive(Debug, Default)]
pub struct UpdateState {
    current_version: OnceLock<String>,
    latest: OnceLock<UpdateResponse>,
}

impl UpdateState {
    /// Create an empty, unready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the version of the running binary.
    ///
    /// Returns `false` if a version was already recorded; the first value wins.
    pub fn record_current_version(&self, version: impl Into<String>) -> bool {
        self.current_version.set(version.into()).is_ok()
    }

    /// Version of the running binary, if recorded.
    pub fn current_version(&self) -> Option<&str> {
        self.current_version.get().map(String::as_str)
    }

    /// Publish a successfully decoded payload and mark the state ready.
    ///
    /// Returns `false` (and leaves the existing payload untouched) if a
    /// payload was already published.
    pub fn publish(&self, response: UpdateResponse) -> bool {
        self.latest.set(response).is_ok()
    }

    /// Whether a payload has been published.
    pub fn is_ready(&self) -> bool {
        self.latest.get().is_some()
    }

    /// The published payload, or `None` while unready.
    pub fn latest(&self) -> Option<&UpdateResponse> {
        self.latest.get()
    }
}
