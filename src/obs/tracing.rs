// self
use crate::{_prelude::*, http::Method};

/// A span wrapping one dispatched call.
#[derive(Clone, Debug)]
pub struct DispatchSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl DispatchSpan {
	/// Creates a new span tagged with the method and target URL.
	pub fn new(method: Method, url: &Url) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("blueliv_api.dispatch", method = method.as_str(), url = %url);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, url);

			Self {}
		}
	}

	/// Enters the span for the duration of the blocking call.
	pub fn entered(self) -> DispatchSpanGuard {
		#[cfg(feature = "tracing")]
		{
			DispatchSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			DispatchSpanGuard {}
		}
	}
}

/// RAII guard returned by [`DispatchSpan::entered`].
pub struct DispatchSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for DispatchSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("DispatchSpanGuard(..)")
	}
}

/// Emits a debug event with the status of a received response.
pub fn trace_response(status: u16, url: &Url) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(status, url = %url, "Response received.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, url);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn dispatch_span_noop_without_tracing() {
		let url = Url::parse("https://community.blueliv.com/api/v1/sparks")
			.expect("Test URL should parse successfully.");
		let _guard = DispatchSpan::new(Method::Get, &url).entered();

		trace_response(200, &url);
	}
}
