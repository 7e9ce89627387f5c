//! Progress reporting for the image job.
//!
//! The job reports through [`ProgressCallback`] so callers choose how (or
//! whether) to render it; the CLI plugs in an `indicatif` bar.

use std::sync::Arc;

/// Receives progress updates from the image job.
pub trait ProgressCallback: Send + Sync {
    /// Total number of species to process.
    fn set_total(&self, total: u64);

    /// Advance by `delta` species.
    fn inc(&self, delta: u64);

    /// Update the status message (usually the species being processed).
    fn set_message(&self, msg: String);

    /// Mark the job finished with a summary message.
    fn finish(&self, msg: String);
}

/// Discards all progress updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`].
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
