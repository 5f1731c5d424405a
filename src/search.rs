//! Search policy layered over the dispatcher.
//!
//! The service exposes one search endpoint per resource family, but only IoCs, sparks, and tags
//! are searchable. The helper rejects every other category before any network I/O.

// self
use crate::{
	_prelude::*,
	config::ResourcePaths,
	dispatch::{Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	error::CallerError,
	http::HttpTransport,
};

/// Name of the dispatcher's own default category; never searchable.
pub const RESERVED_CATEGORY: &str = "core";

/// Resource families known to the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
	/// Indicators of compromise.
	Iocs,
	/// Community posts.
	Sparks,
	/// Tags.
	Tags,
	/// Users.
	Users,
	/// URL and text submission.
	Crawl,
}
impl Category {
	/// Categories accepted by [`Dispatcher::search`].
	pub const SEARCHABLE: [Category; 3] = [Category::Iocs, Category::Sparks, Category::Tags];

	/// Returns the wire name, also used as the search segment.
	pub const fn as_str(self) -> &'static str {
		match self {
			Category::Iocs => "iocs",
			Category::Sparks => "sparks",
			Category::Tags => "tags",
			Category::Users => "users",
			Category::Crawl => "crawl",
		}
	}

	/// Returns `true` when the service offers a search for this category.
	pub const fn is_searchable(self) -> bool {
		matches!(self, Category::Iocs | Category::Sparks | Category::Tags)
	}
}
impl Display for Category {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Category {
	type Err = CallerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"iocs" => Ok(Category::Iocs),
			"sparks" => Ok(Category::Sparks),
			"tags" => Ok(Category::Tags),
			"users" => Ok(Category::Users),
			"crawl" => Ok(Category::Crawl),
			RESERVED_CATEGORY => Err(CallerError::ReservedCategory),
			other => Err(CallerError::UnknownCategory { name: other.into() }),
		}
	}
}

/// Parameters of one search call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
	/// Search term, always sent.
	pub term: String,
	/// Tag filter; omitted when absent or empty.
	pub tag: Option<String>,
	/// Maximum number of results; omitted when not positive.
	pub limit: i64,
	/// Only return results newer than this id; omitted when not positive.
	pub since_id: i64,
	/// Representation of a successful body.
	pub output: OutputMode,
}
impl SearchQuery {
	/// Creates a query for `term` with no filters.
	pub fn new(term: impl Into<String>) -> Self {
		Self { term: term.into(), ..Default::default() }
	}

	/// Sets the tag filter.
	pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
		self.tag = Some(tag.into());

		self
	}

	/// Sets the result limit.
	pub fn with_limit(mut self, limit: i64) -> Self {
		self.limit = limit;

		self
	}

	/// Sets the lower id bound.
	pub fn with_since_id(mut self, since_id: i64) -> Self {
		self.since_id = since_id;

		self
	}

	/// Selects how a successful body is returned.
	pub fn with_output(mut self, output: OutputMode) -> Self {
		self.output = output;

		self
	}
}

/// Builds the GET request for a search, rejecting unsearchable categories.
pub fn build_search_request(
	paths: &ResourcePaths,
	category: Category,
	query: &SearchQuery,
) -> Result<RequestSpec, CallerError> {
	if !category.is_searchable() {
		return Err(CallerError::UnsearchableCategory { category: category.as_str() });
	}

	let spec = RequestSpec::get(paths.search.as_str())
		.with_search_segment(category.as_str())
		.with_query("search", query.term.as_str())
		.with_optional_query("tag", query.tag.as_deref())
		.with_positive_query("limit", query.limit)
		.with_positive_query("since_id", query.since_id)
		.with_output(query.output);

	Ok(spec)
}

impl<C> Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	/// Searches one category.
	///
	/// Unsearchable categories fail before the request counter moves.
	pub fn search(&self, category: Category, query: &SearchQuery) -> Result<ResponseOutcome> {
		let spec = build_search_request(&self.settings().paths, category, query)?;

		self.dispatch(spec)
	}

	/// Searches a category given by name.
	///
	/// `core` is rejected as reserved and unknown names as unknown.
	pub fn search_named(&self, category: &str, query: &SearchQuery) -> Result<ResponseOutcome> {
		self.search(category.parse()?, query)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, http::Method};

	#[test]
	fn search_query_omits_non_positive_filters() {
		let spec = build_search_request(
			&ResourcePaths::default(),
			Category::Iocs,
			&SearchQuery::new("evil.com").with_limit(10).with_since_id(0),
		)
		.expect("IoC searches should build.");
		let expected = BTreeMap::from([
			("limit".to_owned(), "10".to_owned()),
			("search".to_owned(), "evil.com".to_owned()),
		]);

		assert_eq!(spec.query, expected);
		assert_eq!(spec.resource.as_deref(), Some("/search"));
		assert_eq!(spec.search_segment.as_deref(), Some("iocs"));
		assert_eq!(spec.effective_method(), Method::Get);
	}

	#[test]
	fn empty_tags_are_omitted() {
		let spec = build_search_request(
			&ResourcePaths::default(),
			Category::Tags,
			&SearchQuery::new("apt").with_tag("").with_limit(-1).with_since_id(-5),
		)
		.expect("Tag searches should build.");

		assert_eq!(spec.query.keys().collect::<Vec<_>>(), vec!["search"]);

		let spec = build_search_request(
			&ResourcePaths::default(),
			Category::Sparks,
			&SearchQuery::new("apt").with_tag("ransomware").with_since_id(7),
		)
		.expect("Spark searches should build.");

		assert_eq!(spec.query.get("tag").map(String::as_str), Some("ransomware"));
		assert_eq!(spec.query.get("since_id").map(String::as_str), Some("7"));
	}

	#[test]
	fn unsearchable_categories_never_reach_the_transport() {
		let dispatcher = test_dispatcher(StubTransport::default());

		for category in [Category::Users, Category::Crawl] {
			let err = dispatcher
				.search(category, &SearchQuery::new("x"))
				.expect_err("Unsearchable categories should fail.");

			assert!(matches!(err, Error::Caller(CallerError::UnsearchableCategory { .. })));
		}

		assert!(dispatcher.transport().requests().is_empty());
		assert_eq!(dispatcher.request_count(), 0);
	}

	#[test]
	fn named_categories_reject_reserved_and_unknown_names() {
		let dispatcher = test_dispatcher(StubTransport::default());
		let err = dispatcher
			.search_named("core", &SearchQuery::new("x"))
			.expect_err("The reserved category should fail.");

		assert!(matches!(err, Error::Caller(CallerError::ReservedCategory)));

		let err = dispatcher
			.search_named("malwares", &SearchQuery::new("x"))
			.expect_err("Unknown categories should fail.");

		assert!(matches!(
			err,
			Error::Caller(CallerError::UnknownCategory { ref name }) if name == "malwares"
		));
		assert!(dispatcher.transport().requests().is_empty());
	}

	#[test]
	fn search_dispatches_to_the_category_segment() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher
			.search_named("iocs", &SearchQuery::new("evil.com").with_limit(10))
			.expect("IoC searches should dispatch.");

		let request = dispatcher.transport().last_request().expect("A request should be sent.");

		assert_eq!(
			request.url.as_str(),
			"https://community.blueliv.com/api/v1/search/iocs?limit=10&search=evil.com"
		);
		assert!(request.body.is_empty());
	}

	#[test]
	fn categories_parse_and_report_searchability() {
		for category in Category::SEARCHABLE {
			assert_eq!(category.as_str().parse::<Category>(), Ok(category));
			assert!(category.is_searchable());
		}

		assert!(!Category::Users.is_searchable());
		assert!(!Category::Crawl.is_searchable());
	}
}
