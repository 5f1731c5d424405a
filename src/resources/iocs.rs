//! Indicators of compromise: type catalogue, feeds, and search.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::HttpTransport,
	resources::Page,
	search::Category,
};

/// IoC endpoints.
pub struct Iocs<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Iocs<'a, C>
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

	/// Lists the IoC types known to the service.
	pub fn types(&self) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		self.dispatcher
			.dispatch(RequestSpec::get(paths.iocs_types.as_str()).with_output(self.output))
	}

	/// Lists IoCs in publication order.
	pub fn timeline(&self, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		self.feed(format!("{}{}", paths.iocs, paths.iocs_timeline), page)
	}

	/// Lists IoCs the service considers relevant.
	pub fn discover(&self, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		self.feed(format!("{}{}", paths.iocs, paths.iocs_discover), page)
	}

	/// Searches IoCs by term.
	pub fn search(&self, term: &str, page: Page) -> Result<ResponseOutcome> {
		self.dispatcher.search(Category::Iocs, &page.search(term).with_output(self.output))
	}

	fn feed(&self, resource: String, page: Page) -> Result<ResponseOutcome> {
		self.dispatcher.dispatch(page.apply(RequestSpec::get(resource)).with_output(self.output))
	}
}
impl<C> Debug for Iocs<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Iocs").field("output", &self.output).finish()
	}
}
