//! Optional observability helpers for dispatched calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `blueliv_api.dispatch` with the `method` and `url`
//!   fields, plus a debug event carrying the response status.
//! - Enable `metrics` to increment the `blueliv_api_dispatch_total` counter for every
//!   attempt/success/failure, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
	/// Entry to the dispatcher.
	Attempt,
	/// HTTP 200 response.
	Success,
	/// Caller, transport, or decode error, or a non-200 status.
	Failure,
}
impl DispatchOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DispatchOutcome::Attempt => "attempt",
			DispatchOutcome::Success => "success",
			DispatchOutcome::Failure => "failure",
		}
	}
}
impl Display for DispatchOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
