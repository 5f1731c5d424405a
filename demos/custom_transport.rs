//! Demonstrates plugging a custom blocking transport into the dispatcher.

// std
use std::convert::Infallible;
// crates.io
use color_eyre::Result;
// self
use blueliv_api::{
	Dispatcher, Settings,
	http::{HttpTransport, InboundResponse, OutboundRequest},
};

/// Answers every call locally with the request line it received.
struct LoopbackTransport;
impl HttpTransport for LoopbackTransport {
	type TransportError = Infallible;

	fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Self::TransportError> {
		let body = serde_json::json!({ "method": request.method, "url": request.url.as_str() });

		Ok(InboundResponse::new(200, body.to_string()))
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let dispatcher =
		<Dispatcher<LoopbackTransport>>::with_transport(Settings::from_env()?, LoopbackTransport)?;
	let me = dispatcher.users().me()?.into_result()?;

	println!("Loopback answer: {me:?}.");

	Ok(())
}
