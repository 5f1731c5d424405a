//! Tags and the sparks or IoCs filed under them.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::HttpTransport,
	resources::{self, Page},
	search::Category,
};

/// Tag endpoints.
pub struct Tags<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Tags<'a, C>
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

	/// Lists every tag.
	pub fn list(&self) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		self.dispatcher.dispatch(RequestSpec::get(paths.tags.as_str()).with_output(self.output))
	}

	/// Lists sparks filed under `slug`.
	pub fn sparks(&self, slug: &str, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let slug = resources::path_segment(slug)?;

		self.nested(format!("{}/{slug}{}", paths.tags, paths.tags_sparks), page)
	}

	/// Lists IoCs filed under `slug`.
	pub fn iocs(&self, slug: &str, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let slug = resources::path_segment(slug)?;

		self.nested(format!("{}/{slug}{}", paths.tags, paths.tags_iocs), page)
	}

	/// Searches tags by term.
	pub fn search(&self, term: &str, page: Page) -> Result<ResponseOutcome> {
		self.dispatcher.search(Category::Tags, &page.search(term).with_output(self.output))
	}

	fn nested(&self, resource: String, page: Page) -> Result<ResponseOutcome> {
		self.dispatcher.dispatch(page.apply(RequestSpec::get(resource)).with_output(self.output))
	}
}
impl<C> Debug for Tags<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Tags").field("output", &self.output).finish()
	}
}
