//! Per-call request description and body encoding selection.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	dispatch::OutputMode,
	error::CallerError,
	http::{FilePart, Method, OutboundBody},
};

/// JSON object used as a request body.
pub type BodyFields = Map<String, Value>;

/// Body encodings understood by the dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
	/// No body; the only encoding a GET request resolves to.
	#[default]
	None,
	/// `application/x-www-form-urlencoded`.
	Form,
	/// `application/json`.
	Json,
	/// `multipart/form-data`; always sent as POST.
	Multipart,
}

/// Sparse description of one API call.
///
/// Every field is optional except the method; the dispatcher fills the gaps with its settings.
#[derive(Clone, Debug, Default)]
pub struct RequestSpec {
	/// Path appended to the base URL (e.g. `/sparks/42`).
	pub resource: Option<String>,
	/// Segment appended after the resource, separated by `/`.
	pub search_segment: Option<String>,
	/// Query parameters; keys are unique.
	pub query: BTreeMap<String, String>,
	/// Body fields, if any.
	pub body: Option<BodyFields>,
	/// File attachments; any attachment forces a multipart POST.
	pub files: Vec<FilePart>,
	/// Encoding requested by the caller.
	pub encoding: BodyEncoding,
	/// Method requested by the caller.
	pub method: Method,
	/// Representation of a successful body.
	pub output: OutputMode,
}
impl RequestSpec {
	/// Creates a GET request for `resource`.
	pub fn get(resource: impl Into<String>) -> Self {
		Self { resource: Some(resource.into()), ..Default::default() }
	}

	/// Creates a form-encoded POST request for `resource` carrying `body`.
	pub fn post(resource: impl Into<String>, body: BodyFields) -> Self {
		Self {
			resource: Some(resource.into()),
			body: Some(body),
			method: Method::Post,
			encoding: BodyEncoding::Form,
			..Default::default()
		}
	}

	/// Sets the segment appended after the resource path.
	pub fn with_search_segment(mut self, segment: impl Into<String>) -> Self {
		self.search_segment = Some(segment.into());

		self
	}

	/// Inserts a query parameter, replacing any previous value for `key`.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.insert(key.into(), value.into());

		self
	}

	/// Inserts a query parameter only when `value` is present and non-empty.
	pub fn with_optional_query(
		self,
		key: impl Into<String>,
		value: Option<impl Into<String>>,
	) -> Self {
		match value.map(Into::into).filter(|value: &String| !value.is_empty()) {
			Some(value) => self.with_query(key, value),
			None => self,
		}
	}

	/// Inserts a numeric filter only when it is strictly positive.
	///
	/// The service reads zero and negative filters as "no filter", so they are never sent.
	pub fn with_positive_query(self, key: impl Into<String>, value: i64) -> Self {
		if value > 0 { self.with_query(key, value.to_string()) } else { self }
	}

	/// Sets the body fields.
	pub fn with_body(mut self, body: BodyFields) -> Self {
		self.body = Some(body);

		self
	}

	/// Requests JSON encoding for the body.
	pub fn json(mut self) -> Self {
		self.encoding = BodyEncoding::Json;

		self
	}

	/// Overrides the requested encoding.
	pub fn with_encoding(mut self, encoding: BodyEncoding) -> Self {
		self.encoding = encoding;

		self
	}

	/// Attaches a file, which turns the call into a multipart POST.
	pub fn with_file(mut self, file: FilePart) -> Self {
		self.files.push(file);

		self
	}

	/// Overrides the requested method.
	pub fn with_method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Selects how a successful body is returned.
	pub fn with_output(mut self, output: OutputMode) -> Self {
		self.output = output;

		self
	}

	/// Returns the method the dispatcher will actually use.
	pub fn effective_method(&self) -> Method {
		resolve(self.method, self.encoding, !self.files.is_empty()).0
	}

	/// Returns the encoding the dispatcher will actually use.
	pub fn effective_encoding(&self) -> BodyEncoding {
		resolve(self.method, self.encoding, !self.files.is_empty()).1
	}
}

/// Resolves the final method and encoding.
///
/// Attachments (or an explicit multipart request) win over everything and force POST. A GET
/// never resolves to a body encoding. A POST uses JSON only when asked to and form otherwise.
fn resolve(method: Method, requested: BodyEncoding, has_files: bool) -> (Method, BodyEncoding) {
	if has_files || requested == BodyEncoding::Multipart {
		return (Method::Post, BodyEncoding::Multipart);
	}

	match (method, requested) {
		(Method::Get, _) => (Method::Get, BodyEncoding::None),
		(Method::Post, BodyEncoding::Json) => (Method::Post, BodyEncoding::Json),
		(Method::Post, _) => (Method::Post, BodyEncoding::Form),
	}
}

/// Validates the call shape and encodes the body for the transport.
pub(crate) fn encode_body(
	method: Method,
	requested: BodyEncoding,
	body: Option<BodyFields>,
	files: Vec<FilePart>,
) -> Result<(Method, BodyEncoding, OutboundBody), CallerError> {
	let (method, encoding) = resolve(method, requested, !files.is_empty());
	let outbound = match encoding {
		BodyEncoding::None => {
			if body.is_some() {
				return Err(CallerError::BodyOnGet);
			}

			OutboundBody::Empty
		},
		BodyEncoding::Multipart => {
			if body.is_none() && files.is_empty() {
				return Err(CallerError::MissingBody);
			}

			let fields = body.as_ref().map(form_pairs).unwrap_or_default();

			OutboundBody::Multipart { fields, files }
		},
		BodyEncoding::Json =>
			OutboundBody::Json(Value::Object(body.ok_or(CallerError::MissingBody)?)),
		BodyEncoding::Form =>
			OutboundBody::Form(form_pairs(&body.ok_or(CallerError::MissingBody)?)),
	};

	Ok((method, encoding, outbound))
}

/// Flattens body fields into form pairs.
///
/// Nulls are dropped, arrays become one pair per element, and nested structures travel as
/// JSON text.
pub fn form_pairs(fields: &BodyFields) -> Vec<(String, String)> {
	let mut pairs = Vec::with_capacity(fields.len());

	for (key, value) in fields {
		match value {
			Value::Array(items) =>
				for item in items {
					if let Some(text) = field_text(item) {
						pairs.push((key.clone(), text));
					}
				},
			other =>
				if let Some(text) = field_text(other) {
					pairs.push((key.clone(), text));
				},
		}
	}

	pairs
}

fn field_text(value: &Value) -> Option<String> {
	match value {
		Value::Null => None,
		Value::String(text) => Some(text.clone()),
		other => Some(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	fn fields(value: Value) -> BodyFields {
		match value {
			Value::Object(map) => map,
			_ => panic!("Test bodies must be JSON objects."),
		}
	}

	#[test]
	fn get_with_body_is_a_caller_error() {
		let spec = RequestSpec::get("/sparks").with_body(fields(json!({ "title": "x" })));
		let err = encode_body(spec.method, spec.encoding, spec.body, spec.files)
			.expect_err("GET bodies should be rejected.");

		assert_eq!(err, CallerError::BodyOnGet);
	}

	#[test]
	fn get_without_body_encodes_nothing() {
		let (method, encoding, body) =
			encode_body(Method::Get, BodyEncoding::Json, None, Vec::new())
				.expect("Plain GET requests should encode.");

		assert_eq!(method, Method::Get);
		assert_eq!(encoding, BodyEncoding::None);
		assert!(body.is_empty());
	}

	#[test]
	fn post_without_body_is_a_caller_error() {
		for requested in [BodyEncoding::Form, BodyEncoding::Json, BodyEncoding::Multipart] {
			let err = encode_body(Method::Post, requested, None, Vec::new())
				.expect_err("Bodiless POST requests should be rejected.");

			assert_eq!(err, CallerError::MissingBody);
		}
	}

	#[test]
	fn files_force_multipart_post_over_json() {
		let spec = RequestSpec::get("/malwares/upload")
			.json()
			.with_body(fields(json!({ "comment": "dropper" })))
			.with_file(FilePart::new("file", "sample.bin", b"MZ".to_vec()));

		assert_eq!(spec.effective_method(), Method::Post);
		assert_eq!(spec.effective_encoding(), BodyEncoding::Multipart);

		let (method, _, body) = encode_body(spec.method, spec.encoding, spec.body, spec.files)
			.expect("Multipart requests should encode.");

		assert_eq!(method, Method::Post);

		let OutboundBody::Multipart { fields, files } = body else {
			panic!("Attachments should produce a multipart body.");
		};

		assert_eq!(fields, vec![("comment".into(), "dropper".into())]);
		assert_eq!(files.len(), 1);
	}

	#[test]
	fn json_encoding_keeps_the_document() {
		let spec = RequestSpec::post("/crawl", fields(json!({ "url": "evil.com", "text": false })))
			.json();
		let (_, encoding, body) = encode_body(spec.method, spec.encoding, spec.body, spec.files)
			.expect("JSON requests should encode.");

		assert_eq!(encoding, BodyEncoding::Json);
		assert_eq!(body, OutboundBody::Json(json!({ "url": "evil.com", "text": false })));
	}

	#[test]
	fn form_pairs_flatten_values() {
		let pairs = form_pairs(&fields(json!({
			"title": "x",
			"count": 3,
			"flag": true,
			"missing": null,
			"tags": ["apt", "rat"],
		})));

		assert_eq!(
			pairs,
			vec![
				("title".into(), "x".into()),
				("count".into(), "3".into()),
				("flag".into(), "true".into()),
				("tags".into(), "apt".into()),
				("tags".into(), "rat".into()),
			]
		);
	}

	#[test]
	fn optional_and_positive_queries_skip_absent_values() {
		let spec = RequestSpec::get("/iocs/timeline")
			.with_optional_query("tag", None::<String>)
			.with_optional_query("empty", Some(""))
			.with_optional_query("kept", Some("yes"))
			.with_positive_query("limit", 0)
			.with_positive_query("since_id", -4)
			.with_positive_query("page", 2);

		assert_eq!(spec.query.len(), 2);
		assert_eq!(spec.query.get("kept").map(String::as_str), Some("yes"));
		assert_eq!(spec.query.get("page").map(String::as_str), Some("2"));
	}
}
