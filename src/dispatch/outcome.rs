//! Response interpretation: status classification and success-body decoding.

// std
use std::io;
// crates.io
use serde_json::{
	Value,
	ser::{Formatter as JsonFormatter, Serializer},
};
// self
use crate::{_prelude::*, error::DecodeError, http::InboundResponse};

/// Representation chosen by the caller for successful bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
	/// Parsed JSON tree.
	#[default]
	Structured,
	/// JSON text with `", "` and `": "` separators.
	Text,
}

/// Successful body in the representation the caller asked for.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// Parsed JSON tree.
	Structured(Value),
	/// Re-serialized JSON text.
	Text(String),
}
impl Payload {
	/// Returns the parsed tree when the payload is structured.
	pub fn as_value(&self) -> Option<&Value> {
		match self {
			Payload::Structured(value) => Some(value),
			Payload::Text(_) => None,
		}
	}

	/// Returns the text when the payload is textual.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Payload::Structured(_) => None,
			Payload::Text(text) => Some(text),
		}
	}
}

/// Classification of a non-200 response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FailureKind {
	/// 400: the service rejected the request shape.
	BadRequest,
	/// 422: the service rejected a search or query term.
	UnprocessableTerm,
	/// Any other non-200 status.
	Unexpected,
}
impl FailureKind {
	/// Classifies a non-200 status code.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => FailureKind::BadRequest,
			422 => FailureKind::UnprocessableTerm,
			_ => FailureKind::Unexpected,
		}
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FailureKind::BadRequest => "bad_request",
			FailureKind::UnprocessableTerm => "unprocessable_term",
			FailureKind::Unexpected => "unexpected",
		}
	}
}
impl Display for FailureKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Non-200 response surfaced verbatim to the caller.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Request to {url} failed with HTTP {status} ({kind}): {body}.")]
pub struct ApiFailure {
	/// Classification of the status.
	pub kind: FailureKind,
	/// HTTP status code.
	pub status: u16,
	/// Raw response body, decoded lossily as UTF-8.
	pub body: String,
	/// URL the request was sent to.
	pub url: Url,
}

/// Result of one dispatched call that reached the service.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseOutcome {
	/// 200 response; `None` when the body was empty or falsy.
	Success(Option<Payload>),
	/// Any other status.
	Failure(ApiFailure),
}
impl ResponseOutcome {
	/// Returns `true` for [`ResponseOutcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, ResponseOutcome::Success(_))
	}

	/// Returns the success payload, if any.
	pub fn payload(&self) -> Option<&Payload> {
		match self {
			ResponseOutcome::Success(payload) => payload.as_ref(),
			ResponseOutcome::Failure(_) => None,
		}
	}

	/// Returns the failure, if any.
	pub fn failure(&self) -> Option<&ApiFailure> {
		match self {
			ResponseOutcome::Success(_) => None,
			ResponseOutcome::Failure(failure) => Some(failure),
		}
	}

	/// Converts a failure into [`Error::Api`](crate::error::Error::Api) so callers can use `?`.
	pub fn into_result(self) -> Result<Option<Payload>> {
		match self {
			ResponseOutcome::Success(payload) => Ok(payload),
			ResponseOutcome::Failure(failure) => Err(failure.into()),
		}
	}
}

/// Turns a raw response into an outcome.
///
/// Only a 200 is a success. Its body is parsed as JSON; an empty body or a falsy value (`null`,
/// `false`, `0`, `""`, `[]`, `{}`) yields `Success(None)`.
pub fn interpret(
	response: InboundResponse,
	url: &Url,
	output: OutputMode,
) -> Result<ResponseOutcome, DecodeError> {
	let InboundResponse { status, body } = response;

	if status != 200 {
		return Ok(ResponseOutcome::Failure(ApiFailure {
			kind: FailureKind::from_status(status),
			status,
			body: String::from_utf8_lossy(&body).into_owned(),
			url: url.clone(),
		}));
	}
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(ResponseOutcome::Success(None));
	}

	let mut deserializer = serde_json::Deserializer::from_slice(&body);
	let value: Value = serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
		DecodeError::MalformedJson { url: url.to_string(), status, source }
	})?;

	deserializer
		.end()
		.map_err(|source| DecodeError::TrailingData { url: url.to_string(), status, source })?;

	if is_falsy(&value) {
		return Ok(ResponseOutcome::Success(None));
	}

	let payload = match output {
		OutputMode::Structured => Payload::Structured(value),
		OutputMode::Text => Payload::Text(render_text(&value)?),
	};

	Ok(ResponseOutcome::Success(Some(payload)))
}

/// Returns `true` for values that carry no information.
pub fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(flag) => !flag,
		Value::Number(number) => number.as_f64() == Some(0.0),
		Value::String(text) => text.is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
	}
}

/// Renders `value` as single-line JSON with `", "` and `": "` separators.
pub fn render_text(value: &Value) -> Result<String, DecodeError> {
	let mut buf = Vec::new();
	let mut serializer = Serializer::with_formatter(&mut buf, SpacedFormatter);

	value.serialize(&mut serializer).map_err(DecodeError::Render)?;

	Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct SpacedFormatter;
impl JsonFormatter for SpacedFormatter {
	fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		if first { Ok(()) } else { writer.write_all(b", ") }
	}

	fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		if first { Ok(()) } else { writer.write_all(b", ") }
	}

	fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
	where
		W: ?Sized + io::Write,
	{
		writer.write_all(b": ")
	}
}
