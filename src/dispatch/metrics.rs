//! Per-dispatcher call counters.

// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for dispatched calls.
///
/// The request counter moves before any validation, so calls rejected for their shape are
/// counted too.
#[derive(Debug, Default)]
pub struct CallMetrics {
	requests: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
}
impl CallMetrics {
	/// Returns the number of dispatch attempts made through the owning dispatcher.
	pub fn request_count(&self) -> u64 {
		self.requests.load(Ordering::Relaxed)
	}

	/// Returns the number of calls answered with HTTP 200.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that ended in any error or non-200 status.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	pub(crate) fn record_request(&self) {
		self.requests.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}
}
