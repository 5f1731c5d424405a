//! Client-level error types shared by the dispatcher, the search helper, and the façades.

// self
use crate::{_prelude::*, dispatch::ApiFailure};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Malformed call shape, detected before any network I/O.
	#[error(transparent)]
	Caller(#[from] CallerError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// The service answered 200 with a body that is not JSON.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// The service rejected the request; see [`ApiFailure::kind`].
	#[error(transparent)]
	Api(#[from] ApiFailure),
}

/// Call-shape violations raised before the dispatcher touches the network.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum CallerError {
	/// POST requests need a body or at least one file attachment.
	#[error("POST requests must provide a body.")]
	MissingBody,
	/// GET requests never carry a body.
	#[error("GET requests must not provide a body.")]
	BodyOnGet,
	/// The category exists but the service offers no search for it.
	#[error("Category `{category}` is not searchable; search supports iocs, sparks, and tags.")]
	UnsearchableCategory {
		/// Category label that was requested.
		category: &'static str,
	},
	/// The dispatcher's own default category can never be searched.
	#[error("Category `core` is reserved and cannot be searched.")]
	ReservedCategory,
	/// The category name does not match any resource family.
	#[error("Category `{name}` is unknown.")]
	UnknownCategory {
		/// Name supplied by the caller.
		name: String,
	},
	/// The explicit token cannot travel in an HTTP header.
	#[error("Explicit token contains characters that are not allowed in an HTTP header.")]
	InvalidToken,
	/// An identifier cannot stand as a single path segment.
	#[error("Path segment `{segment}` is empty or a dot segment.")]
	InvalidPathSegment {
		/// Identifier supplied by the caller.
		segment: String,
	},
	/// Resource path and search segment did not compose into a valid URL.
	#[error("Composed URL `{raw}` is invalid.")]
	MalformedUrl {
		/// URL text after composition.
		raw: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Configuration and validation failures raised while building settings or clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL `{value}` is invalid.")]
	InvalidBaseUrl {
		/// Raw base URL value.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL parsed but does not use HTTP(S).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Authorization header name is not a valid HTTP token.
	#[error("Authorization header name `{name}` is invalid.")]
	InvalidHeaderName {
		/// Rejected header name.
		name: String,
	},
	/// Rendered authorization value holds bytes HTTP headers cannot carry.
	#[error("Header `{header}` carries characters that are not allowed in an HTTP header value.")]
	InvalidHeaderValue {
		/// Header whose value failed validation.
		header: String,
	},
	/// Authorization format must embed the token exactly once.
	#[error("Authorization format `{format}` must contain exactly one `%s` placeholder.")]
	InvalidAuthorizationFormat {
		/// Rejected format string.
		format: String,
	},
	/// Resource path fragments are appended verbatim and must start with `/`.
	#[error("Path fragment `{setting}` must start with `/`: {value}.")]
	InvalidPathFragment {
		/// Setting that failed validation.
		setting: &'static str,
		/// Rejected fragment.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// URL the request was sent to.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while calling `url`.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

/// Successful responses whose body could not be decoded.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// The body of a 200 response is not valid JSON.
	#[error("Response from {url} returned malformed JSON.")]
	MalformedJson {
		/// URL the request was sent to.
		url: String,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The body of a 200 response holds more than one JSON value.
	#[error("Response from {url} carried data after the JSON document.")]
	TrailingData {
		/// URL the request was sent to.
		url: String,
		/// HTTP status code of the response.
		status: u16,
		/// Parser failure reported at the trailing data.
		#[source]
		source: serde_json::Error,
	},
	/// A decoded value could not be rendered back into text.
	#[error("Response value could not be rendered as text.")]
	Render(#[source] serde_json::Error),
}
