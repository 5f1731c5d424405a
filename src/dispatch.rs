//! Generic request dispatcher shared by the search helper and every resource façade.
//!
//! A [`Dispatcher`] owns the validated [`Settings`], the [`ClientIdentity`] computed from them,
//! and the [`HttpTransport`] that performs the round trip. Each call to [`Dispatcher::dispatch`]
//! turns one sparse [`RequestSpec`] into a complete request:
//!
//! 1. The URL is composed as base URL, then resource path, then `/` plus the search segment.
//!    Absent segments add nothing and query parameters are appended only when present.
//! 2. The method and body encoding are resolved: attachments force a multipart POST, otherwise a
//!    POST is JSON or form encoded and a GET never carries a body.
//! 3. The authentication header computed at construction is attached unchanged.
//! 4. The response is interpreted: only a 200 is a success, every other status is returned as an
//!    [`ApiFailure`] inside [`ResponseOutcome::Failure`].
//!
//! Calls are blocking and never retried.

pub mod metrics;
pub mod outcome;
pub mod request;

pub use metrics::*;
pub use outcome::*;
pub use request::*;

// self
use crate::{
	_prelude::*,
	auth::ClientIdentity,
	config::Settings,
	error::{CallerError, TransportError},
	http::{HttpTransport, OutboundRequest},
	obs::{self, DispatchOutcome, DispatchSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Sends API calls built from [`RequestSpec`] values and interprets the responses.
///
/// Counters are atomic and the last-URL slot sits behind a mutex, so a dispatcher can be shared
/// by reference.
pub struct Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	transport: Arc<C>,
	settings: Settings,
	identity: ClientIdentity,
	metrics: CallMetrics,
	last_url: Mutex<Option<Url>>,
}
impl<C> Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a dispatcher over the caller-provided transport, using the configured token.
	pub fn with_transport(settings: Settings, transport: impl Into<Arc<C>>) -> Result<Self> {
		let identity = ClientIdentity::from_settings(&settings, None)?;

		Ok(Self {
			transport: transport.into(),
			settings,
			identity,
			metrics: CallMetrics::default(),
			last_url: Mutex::new(None),
		})
	}

	/// Replaces the configured token with an explicit one.
	///
	/// An empty token keeps the configured one. A token that cannot travel in an HTTP header is
	/// rejected with [`CallerError::InvalidToken`].
	pub fn with_token(mut self, token: &str) -> Result<Self> {
		self.identity = ClientIdentity::from_settings(&self.settings, Some(token))?;

		Ok(self)
	}

	/// Returns the settings the dispatcher was built with.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// Returns the identity attached to every request.
	pub fn identity(&self) -> &ClientIdentity {
		&self.identity
	}

	/// Returns the underlying transport.
	pub fn transport(&self) -> &C {
		&self.transport
	}

	/// Returns the call counters.
	pub fn metrics(&self) -> &CallMetrics {
		&self.metrics
	}

	/// Returns the number of [`Self::dispatch`] calls made so far, whatever their outcome.
	pub fn request_count(&self) -> u64 {
		self.metrics.request_count()
	}

	/// Returns the URL of the most recent request handed to the transport.
	pub fn last_url(&self) -> Option<Url> {
		self.last_url.lock().clone()
	}

	/// Sends one API call.
	///
	/// Non-200 statuses come back as `Ok(ResponseOutcome::Failure(_))`. `Err` is reserved for
	/// malformed calls, transport failures, and 200 bodies that are not JSON.
	pub fn dispatch(&self, spec: RequestSpec) -> Result<ResponseOutcome> {
		self.metrics.record_request();

		let method = spec.effective_method();

		obs::record_dispatch_outcome(method, DispatchOutcome::Attempt);

		let result = self.execute(spec);

		match &result {
			Ok(outcome) if outcome.is_success() => {
				self.metrics.record_success();
				obs::record_dispatch_outcome(method, DispatchOutcome::Success);
			},
			_ => {
				self.metrics.record_failure();
				obs::record_dispatch_outcome(method, DispatchOutcome::Failure);
			},
		}

		result
	}

	fn execute(&self, spec: RequestSpec) -> Result<ResponseOutcome> {
		let RequestSpec { resource, search_segment, query, body, files, encoding, method, output } =
			spec;
		let url = compose_url(
			&self.settings.base_url,
			resource.as_deref(),
			search_segment.as_deref(),
			&query,
		)?;
		let (method, _, body) = encode_body(method, encoding, body, files)?;
		let _guard = DispatchSpan::new(method, &url).entered();
		let request = OutboundRequest {
			method,
			url: url.clone(),
			headers: vec![(
				self.identity.header_name().to_owned(),
				self.identity.header_value().to_owned(),
			)],
			body,
		};

		*self.last_url.lock() = Some(url.clone());

		let response =
			self.transport.send(&request).map_err(|e| TransportError::network(&url, e))?;

		obs::trace_response(response.status, &url);

		Ok(interpret(response, &url, output)?)
	}
}
#[cfg(feature = "reqwest")]
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher backed by reqwest's default blocking client.
	pub fn new(settings: Settings) -> Result<Self> {
		Self::with_transport(settings, ReqwestTransport::new()?)
	}

	/// Resolves settings from the process environment and builds a reqwest-backed dispatcher.
	pub fn from_env() -> Result<Self> {
		Self::new(Settings::from_env()?)
	}
}
impl<C> Debug for Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("base_url", &self.settings.base_url.as_str())
			.field("identity", &self.identity)
			.field("request_count", &self.metrics.request_count())
			.finish()
	}
}

/// Joins the base URL, resource path, and search segment, then appends the query.
///
/// A trailing `/` on the base URL is dropped before joining. Empty segments count as absent.
pub fn compose_url(
	base: &Url,
	resource: Option<&str>,
	search_segment: Option<&str>,
	query: &BTreeMap<String, String>,
) -> Result<Url, CallerError> {
	let mut raw = base.as_str().trim_end_matches('/').to_owned();

	if let Some(resource) = resource.filter(|value| !value.is_empty()) {
		raw.push_str(resource);
	}
	if let Some(segment) = search_segment.filter(|value| !value.is_empty()) {
		raw.push('/');
		raw.push_str(segment);
	}

	let mut url = Url::parse(&raw).map_err(|source| CallerError::MalformedUrl { raw, source })?;

	if !query.is_empty() {
		url.query_pairs_mut().extend_pairs(query);
	}

	Ok(url)
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		http::{FilePart, InboundResponse, Method, OutboundBody},
	};

	fn base() -> Url {
		Url::parse("https://community.blueliv.com/api/v1").expect("Base URL should parse.")
	}

	fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
		pairs.iter().map(|(key, value)| ((*key).to_owned(), (*value).to_owned())).collect()
	}

	fn body(value: serde_json::Value) -> BodyFields {
		match value {
			serde_json::Value::Object(map) => map,
			_ => panic!("Test bodies must be JSON objects."),
		}
	}

	#[test]
	fn compose_url_joins_segments_in_order() {
		let url = compose_url(&base(), Some("/search"), Some("iocs"), &BTreeMap::new())
			.expect("Search URL should compose.");

		assert_eq!(url.as_str(), "https://community.blueliv.com/api/v1/search/iocs");

		let url = compose_url(&base(), Some("/sparks"), None, &BTreeMap::new())
			.expect("Resource URL should compose.");

		assert_eq!(url.as_str(), "https://community.blueliv.com/api/v1/sparks");

		let url = compose_url(&base(), None, None, &BTreeMap::new())
			.expect("Bare base URL should compose.");

		assert_eq!(url.as_str(), "https://community.blueliv.com/api/v1");
	}

	#[test]
	fn compose_url_treats_absent_and_empty_segments_alike() {
		let absent = compose_url(&base(), Some("/tags"), None, &BTreeMap::new())
			.expect("URL without segment should compose.");
		let empty = compose_url(&base(), Some("/tags"), Some(""), &BTreeMap::new())
			.expect("URL with empty segment should compose.");

		assert_eq!(absent, empty);
	}

	#[test]
	fn compose_url_drops_trailing_base_slash() {
		let base = Url::parse("https://community.blueliv.com/api/v1/").expect("Base should parse.");
		let url = compose_url(&base, Some("/iocs/types"), None, &BTreeMap::new())
			.expect("URL should compose.");

		assert_eq!(url.as_str(), "https://community.blueliv.com/api/v1/iocs/types");
	}

	#[test]
	fn compose_url_appends_query_only_when_present() {
		let url = compose_url(&base(), Some("/search"), Some("iocs"), &query(&[
			("search", "evil.com"),
			("limit", "10"),
		]))
		.expect("URL with query should compose.");

		assert_eq!(
			url.as_str(),
			"https://community.blueliv.com/api/v1/search/iocs?limit=10&search=evil.com"
		);

		let url = compose_url(&base(), Some("/search"), Some("iocs"), &BTreeMap::new())
			.expect("URL without query should compose.");

		assert_eq!(url.query(), None);
	}

	#[test]
	fn every_request_carries_the_identity_header() {
		let dispatcher = test_dispatcher(StubTransport::default())
			.with_token("abc123")
			.expect("Explicit token should be accepted.");

		dispatcher.dispatch(RequestSpec::get("/users/me")).expect("Dispatch should succeed.");

		let request = dispatcher.transport().last_request().expect("A request should be sent.");

		assert_eq!(request.headers, vec![("Authorization".to_owned(), "Token abc123".to_owned())]);
		assert_eq!(request.url.as_str(), "https://community.blueliv.com/api/v1/users/me");
	}

	#[test]
	fn get_requests_never_send_a_body() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher
			.dispatch(RequestSpec::get("/tags").json())
			.expect("GET dispatch should succeed.");

		let request = dispatcher.transport().last_request().expect("A request should be sent.");

		assert_eq!(request.method, Method::Get);
		assert!(request.body.is_empty());
	}

	#[test]
	fn caller_errors_skip_the_transport_but_count() {
		let dispatcher = test_dispatcher(StubTransport::default());
		let err = dispatcher
			.dispatch(RequestSpec::get("/sparks").with_body(body(json!({ "title": "x" }))))
			.expect_err("GET with a body should fail.");

		assert!(matches!(err, Error::Caller(CallerError::BodyOnGet)));

		let err = dispatcher
			.dispatch(RequestSpec::get("/sparks").with_method(Method::Post))
			.expect_err("POST without a body should fail.");

		assert!(matches!(err, Error::Caller(CallerError::MissingBody)));
		assert!(dispatcher.transport().requests().is_empty());
		assert_eq!(dispatcher.request_count(), 2);
		assert_eq!(dispatcher.metrics().failures(), 2);
		assert_eq!(dispatcher.last_url(), None);
	}

	#[test]
	fn request_count_grows_once_per_call() {
		let stub = StubTransport::default()
			.with_response(InboundResponse::new(200, r#"{"a":1}"#))
			.with_response(InboundResponse::new(422, "\"bad term\""))
			.with_response(InboundResponse::new(500, "oops"));
		let dispatcher = test_dispatcher(stub);
		let initial = dispatcher.request_count();

		for _ in 0..3 {
			dispatcher.dispatch(RequestSpec::get("/iocs/types")).expect("Dispatch should return.");
		}

		assert_eq!(dispatcher.request_count(), initial + 3);
		assert_eq!(dispatcher.metrics().successes(), 1);
		assert_eq!(dispatcher.metrics().failures(), 2);
	}

	#[test]
	fn non_200_statuses_are_failures_not_errors() {
		let stub =
			StubTransport::default().with_response(InboundResponse::new(422, "\"bad term\""));
		let dispatcher = test_dispatcher(stub);
		let outcome = dispatcher
			.dispatch(RequestSpec::get("/search").with_search_segment("iocs"))
			.expect("422 responses should be outcomes.");
		let failure = outcome.failure().expect("422 responses should fail.");

		assert_eq!(failure.kind, FailureKind::UnprocessableTerm);
		assert_eq!(failure.status, 422);
		assert_eq!(failure.body, "\"bad term\"");
		assert_eq!(failure.url.as_str(), "https://community.blueliv.com/api/v1/search/iocs");
	}

	#[test]
	fn transport_errors_keep_the_url() {
		let dispatcher = test_dispatcher(StubTransport::failing());
		let err = dispatcher
			.dispatch(RequestSpec::get("/sparks/42"))
			.expect_err("Transport failures should be errors.");

		match err {
			Error::Transport(TransportError::Network { url, .. }) => {
				assert_eq!(url, "https://community.blueliv.com/api/v1/sparks/42");
			},
			other => panic!("Unexpected error: {other:?}."),
		}

		assert_eq!(dispatcher.request_count(), 1);
		assert_eq!(
			dispatcher.last_url().map(String::from),
			Some("https://community.blueliv.com/api/v1/sparks/42".to_owned())
		);
	}

	#[test]
	fn attachments_turn_calls_into_multipart_posts() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher
			.dispatch(
				RequestSpec::get("/malwares/upload")
					.json()
					.with_file(FilePart::new("file", "sample.bin", b"MZ".to_vec())),
			)
			.expect("Upload dispatch should succeed.");

		let request = dispatcher.transport().last_request().expect("A request should be sent.");

		assert_eq!(request.method, Method::Post);
		assert!(matches!(request.body, OutboundBody::Multipart { .. }));
	}

	#[test]
	fn text_output_is_rendered_per_call() {
		let stub = StubTransport::default().with_response(InboundResponse::new(200, r#"{"a":1}"#));
		let dispatcher = test_dispatcher(stub);
		let payload = dispatcher
			.dispatch(RequestSpec::get("/users/me").with_output(OutputMode::Text))
			.expect("Dispatch should succeed.")
			.into_result()
			.expect("200 responses should succeed.")
			.expect("Non-empty bodies should carry a payload.");

		assert_eq!(payload, Payload::Text(r#"{"a": 1}"#.into()));
	}

	#[test]
	fn debug_output_redacts_the_token() {
		let dispatcher = test_dispatcher(StubTransport::default())
			.with_token("super-secret")
			.expect("Explicit token should be accepted.");
		let rendered = format!("{dispatcher:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(rendered.contains("request_count"));
	}

	#[test]
	fn tokens_with_line_breaks_are_caller_errors() {
		let err = test_dispatcher(StubTransport::default())
			.with_token("abc\r\nX-Injected: 1")
			.expect_err("Tokens with line breaks should be rejected.");

		assert!(matches!(err, Error::Caller(CallerError::InvalidToken)));
	}
}
