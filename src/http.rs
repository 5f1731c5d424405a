//! Transport primitives for Blueliv API calls.
//!
//! The dispatcher prepares an [`OutboundRequest`] (method, complete URL, headers, encoded body)
//! and hands it to an [`HttpTransport`]. The transport performs exactly one blocking round trip
//! and returns the raw [`InboundResponse`]; status interpretation stays in the dispatcher, so
//! custom transports never need to know the service's error conventions.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// HTTP methods used by the service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// Read-only retrieval; never carries a body.
	#[default]
	Get,
	/// Submission with a form, JSON, or multipart body.
	Post,
}
impl Method {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// File attachment sent as one multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
	/// Multipart field name.
	pub field: String,
	/// File name reported to the service.
	pub file_name: String,
	/// MIME type; the transport default applies when absent.
	pub content_type: Option<String>,
	/// Raw file content.
	pub bytes: Vec<u8>,
}
impl FilePart {
	/// Creates a part for `field` carrying `bytes` under `file_name`.
	pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self { field: field.into(), file_name: file_name.into(), content_type: None, bytes }
	}

	/// Sets the MIME type of the part.
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());

		self
	}
}
impl Debug for FilePart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FilePart")
			.field("field", &self.field)
			.field("file_name", &self.file_name)
			.field("content_type", &self.content_type)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Encoded request body handed to the transport.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum OutboundBody {
	/// No body.
	#[default]
	Empty,
	/// `application/x-www-form-urlencoded` pairs.
	Form(Vec<(String, String)>),
	/// `application/json` document.
	Json(serde_json::Value),
	/// `multipart/form-data` with text fields followed by file parts.
	Multipart {
		/// Text fields.
		fields: Vec<(String, String)>,
		/// File parts.
		files: Vec<FilePart>,
	},
}
impl OutboundBody {
	/// Returns `true` when no body will be sent.
	pub fn is_empty(&self) -> bool {
		matches!(self, OutboundBody::Empty)
	}
}

/// Fully prepared request: the transport sends it verbatim.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP method.
	pub method: Method,
	/// Complete URL, query string included.
	pub url: Url,
	/// Headers to attach, in order.
	pub headers: Vec<(String, String)>,
	/// Encoded body.
	pub body: OutboundBody,
}

/// Raw response returned by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl InboundResponse {
	/// Creates a response from a status and body.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Abstraction over blocking HTTP transports capable of executing one prepared request.
///
/// The trait is the dispatcher's only dependency on an HTTP stack. Implementations must not
/// retry, follow up, or reinterpret status codes: every non-network outcome, including 4xx and
/// 5xx responses, is returned as an [`InboundResponse`]. Only failures that prevent a response
/// from arriving (DNS, TLS, refused connections) belong in [`Self::TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and returns the raw response.
	fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Self::TransportError>;
}

/// Thin wrapper around reqwest's blocking client so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub BlockingClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with reqwest's default blocking client.
	pub fn new() -> Result<Self, ConfigError> {
		Ok(Self(BlockingClient::builder().build()?))
	}

	/// Wraps an existing blocking client.
	pub fn with_client(client: BlockingClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<BlockingClient> for ReqwestTransport {
	fn as_ref(&self) -> &BlockingClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = BlockingClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn send(&self, request: &OutboundRequest) -> Result<InboundResponse, Self::TransportError> {
		let mut builder = match request.method {
			Method::Get => self.0.get(request.url.clone()),
			Method::Post => self.0.post(request.url.clone()),
		};

		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		builder = match &request.body {
			OutboundBody::Empty => builder,
			OutboundBody::Form(pairs) => builder.form(pairs),
			OutboundBody::Json(document) => builder.json(document),
			OutboundBody::Multipart { fields, files } =>
				builder.multipart(multipart_form(fields, files)?),
		};

		let response = builder.send()?;
		let status = response.status().as_u16();
		let body = response.bytes()?.to_vec();

		Ok(InboundResponse { status, body })
	}
}

#[cfg(feature = "reqwest")]
fn multipart_form(
	fields: &[(String, String)],
	files: &[FilePart],
) -> Result<reqwest::blocking::multipart::Form, ReqwestError> {
	use reqwest::blocking::multipart::{Form, Part};

	let mut form = Form::new();

	for (name, value) in fields {
		form = form.text(name.clone(), value.clone());
	}
	for file in files {
		let mut part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());

		if let Some(content_type) = &file.content_type {
			part = part.mime_str(content_type)?;
		}

		form = form.part(file.field.clone(), part);
	}

	Ok(form)
}
