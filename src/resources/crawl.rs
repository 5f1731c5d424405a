//! URL and free-text submission for crawling.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	dispatch::{BodyFields, Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::HttpTransport,
};

/// Crawl endpoint.
pub struct Crawl<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Crawl<'a, C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates the façade over `dispatcher`.
	pub fn new(dispatcher: &'a Dispatcher<C>) -> Self {
		Self { dispatcher, output: OutputMode::default() }
	}

	/// Selects how successful bodies are returned.
	pub fn with_output(mut self, output: OutputMode) -> Self {
		self.output = output;

		self
	}

	/// Submits a URL, or free text when `is_text` is set, for crawling.
	pub fn crawl(&self, term: &str, is_text: bool) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;
		let mut body = BodyFields::new();

		body.insert("url".into(), Value::from(term));
		body.insert("text".into(), Value::from(is_text));

		self.dispatcher.dispatch(
			RequestSpec::post(paths.crawl.as_str(), body).json().with_output(self.output),
		)
	}
}
impl<C> Debug for Crawl<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Crawl").field("output", &self.output).finish()
	}
}
