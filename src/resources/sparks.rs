//! Sparks: community posts bundling IoCs, source URLs, and tags.

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	dispatch::{BodyFields, Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::HttpTransport,
	resources::{self, Page},
	search::Category,
};

/// Traffic Light Protocol marking attached to a published spark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tlp {
	/// Unlimited disclosure.
	White,
	/// Community-wide disclosure.
	#[default]
	Green,
	/// Limited disclosure.
	Amber,
	/// Named recipients only.
	Red,
}
impl Tlp {
	/// Returns the wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Tlp::White => "white",
			Tlp::Green => "green",
			Tlp::Amber => "amber",
			Tlp::Red => "red",
		}
	}
}
impl Display for Tlp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Content of a spark to publish.
///
/// Empty optional values are left out of the request body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SparkDraft {
	/// Title.
	pub title: String,
	/// Free-form description.
	pub description: String,
	/// Disclosure marking.
	pub tlp: Tlp,
	/// URLs backing the post.
	pub source_urls: Vec<String>,
	/// Identifier of a related malware sample.
	pub source_malware_id: Option<String>,
	/// Tag slugs.
	pub tags: Vec<String>,
	/// Related IoCs, passed through as given.
	pub iocs: Vec<Value>,
}
impl SparkDraft {
	/// Creates a green draft with a title and description.
	pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self { title: title.into(), description: description.into(), ..Default::default() }
	}

	/// Sets the disclosure marking.
	pub fn with_tlp(mut self, tlp: Tlp) -> Self {
		self.tlp = tlp;

		self
	}

	/// Adds a source URL.
	pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
		self.source_urls.push(url.into());

		self
	}

	/// Sets the related malware sample.
	pub fn with_source_malware_id(mut self, id: impl Into<String>) -> Self {
		self.source_malware_id = Some(id.into());

		self
	}

	/// Adds a tag slug.
	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tags.push(tag.into());

		self
	}

	/// Adds a related IoC.
	pub fn with_ioc(mut self, ioc: impl Into<Value>) -> Self {
		self.iocs.push(ioc.into());

		self
	}

	/// Builds the JSON body sent by [`Sparks::publish`].
	pub fn into_body(self) -> BodyFields {
		let mut body = BodyFields::new();

		body.insert("title".into(), self.title.into());
		body.insert("description".into(), self.description.into());
		body.insert("tlp".into(), self.tlp.as_str().into());

		if !self.source_urls.is_empty() {
			body.insert("source_urls".into(), self.source_urls.into());
		}
		if let Some(id) = self.source_malware_id.filter(|id| !id.is_empty()) {
			body.insert("source_malware_id".into(), id.into());
		}
		if !self.tags.is_empty() {
			body.insert("tags".into(), self.tags.into());
		}
		if !self.iocs.is_empty() {
			body.insert("iocs".into(), self.iocs.into());
		}

		body
	}
}

/// Spark endpoints.
pub struct Sparks<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Sparks<'a, C>
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

	/// Fetches one spark.
	pub fn get(&self, id: &str) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;
		let id = resources::path_segment(id)?;

		self.send(RequestSpec::get(format!("{}/{id}", paths.sparks)))
	}

	/// Lists sparks in publication order.
	pub fn timeline(&self, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let resource = format!("{}{}", paths.sparks, paths.sparks_timeline);

		self.send(page.apply(RequestSpec::get(resource)))
	}

	/// Lists sparks the service considers relevant.
	pub fn discover(&self, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let resource = format!("{}{}", paths.sparks, paths.sparks_discover);

		self.send(page.apply(RequestSpec::get(resource)))
	}

	/// Lists the IoCs attached to one spark.
	pub fn iocs(&self, id: &str, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let resource =
			format!("{}/{}{}", paths.sparks, resources::path_segment(id)?, paths.sparks_iocs);

		self.send(page.apply(RequestSpec::get(resource)))
	}

	/// Publishes a new spark as a JSON document.
	pub fn publish(&self, draft: SparkDraft) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		self.send(RequestSpec::post(paths.sparks.as_str(), draft.into_body()).json())
	}

	/// Searches sparks by term, optionally restricted to one tag.
	pub fn search(&self, term: &str, tag: Option<&str>, page: Page) -> Result<ResponseOutcome> {
		let mut query = page.search(term).with_output(self.output);

		query.tag = tag.map(str::to_owned);

		self.dispatcher.search(Category::Sparks, &query)
	}

	fn send(&self, spec: RequestSpec) -> Result<ResponseOutcome> {
		self.dispatcher.dispatch(spec.with_output(self.output))
	}
}
impl<C> Debug for Sparks<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Sparks").field("output", &self.output).finish()
	}
}
