//! Blueliv community API client: IoCs, sparks, tags, users, crawl, and malware upload behind one
//! typed, blocking request dispatcher.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod obs;
pub mod resources;
pub mod search;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::{_prelude::*, error::Error};

	// std
	use std::{collections::VecDeque, io};
	// self
	use crate::{
		config::Settings,
		dispatch::Dispatcher,
		http::{HttpTransport, InboundResponse, OutboundRequest},
	};

	/// In-memory transport that records every request and replies from a queue.
	///
	/// An empty queue answers `200` with an empty body.
	#[derive(Debug, Default)]
	pub struct StubTransport {
		requests: Mutex<Vec<OutboundRequest>>,
		responses: Mutex<VecDeque<InboundResponse>>,
		refuse: bool,
	}
	impl StubTransport {
		/// Creates a transport that fails every call with a refused connection.
		pub fn failing() -> Self {
			Self { refuse: true, ..Default::default() }
		}

		/// Queues a response.
		pub fn with_response(self, response: InboundResponse) -> Self {
			self.responses.lock().push_back(response);

			self
		}

		/// Returns every request sent so far.
		pub fn requests(&self) -> Vec<OutboundRequest> {
			self.requests.lock().clone()
		}

		/// Returns the most recent request.
		pub fn last_request(&self) -> Option<OutboundRequest> {
			self.requests.lock().last().cloned()
		}
	}
	impl HttpTransport for StubTransport {
		type TransportError = io::Error;

		fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Self::TransportError> {
			self.requests.lock().push(request.clone());

			if self.refuse {
				return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "stub refused"));
			}

			Ok(self.responses.lock().pop_front().unwrap_or_else(|| InboundResponse::new(200, "")))
		}
	}

	/// Builds a dispatcher with default settings over `transport`.
	pub fn test_dispatcher(transport: StubTransport) -> Dispatcher<StubTransport> {
		let settings = Settings::builder().build().expect("Default settings should build.");

		Dispatcher::with_transport(settings, transport).expect("Default identity should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as BlockingClient};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::Result;
}

pub use auth::{ApiToken, ClientIdentity, TokenSource};
pub use config::{ResourcePaths, Settings, SettingsBuilder};
#[cfg(feature = "reqwest")] pub use dispatch::ReqwestDispatcher;
pub use dispatch::{
	ApiFailure, Dispatcher, FailureKind, OutputMode, Payload, RequestSpec, ResponseOutcome,
};
pub use error::{Error, Result};
#[cfg(feature = "reqwest")] pub use http::ReqwestTransport;
pub use http::{FilePart, HttpTransport, Method};
pub use resources::{Page, SparkDraft, Tlp};
pub use search::{Category, SearchQuery};

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
