//! Thin façades over the dispatcher, one per resource family.
//!
//! Each façade borrows a [`Dispatcher`], shapes the call from the configured path fragments, and
//! returns the dispatcher's [`ResponseOutcome`](crate::dispatch::ResponseOutcome) unchanged.

pub mod crawl;
pub mod iocs;
pub mod malwares;
pub mod sparks;
pub mod tags;
pub mod users;

pub use crawl::*;
pub use iocs::*;
pub use malwares::*;
pub use sparks::*;
pub use tags::*;
pub use users::*;

// self
use crate::{
	dispatch::{Dispatcher, RequestSpec},
	error::CallerError,
	http::HttpTransport,
	search::SearchQuery,
};

/// Pagination filters shared by listing calls.
///
/// Zero and negative values mean "no filter" and are never sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Page {
	/// Maximum number of items.
	pub limit: i64,
	/// Only return items newer than this id.
	pub since_id: i64,
}
impl Page {
	/// Creates a page with no filters.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the item limit.
	pub fn with_limit(mut self, limit: i64) -> Self {
		self.limit = limit;

		self
	}

	/// Sets the lower id bound.
	pub fn with_since_id(mut self, since_id: i64) -> Self {
		self.since_id = since_id;

		self
	}

	/// Adds the positive filters to `spec`.
	pub fn apply(self, spec: RequestSpec) -> RequestSpec {
		spec.with_positive_query("limit", self.limit).with_positive_query("since_id", self.since_id)
	}

	pub(crate) fn search(self, term: &str) -> SearchQuery {
		SearchQuery::new(term).with_limit(self.limit).with_since_id(self.since_id)
	}
}

/// Percent-encodes a caller-supplied identifier so it lands in exactly one path segment.
///
/// Empty values and the dot segments `.` and `..` are rejected, since URL normalization would
/// drop or climb out of them.
pub fn path_segment(value: &str) -> Result<String, CallerError> {
	if matches!(value, "" | "." | "..") {
		return Err(CallerError::InvalidPathSegment { segment: value.to_owned() });
	}

	Ok(urlencoding::encode(value).into_owned())
}

impl<C> Dispatcher<C>
where
	C: ?Sized + HttpTransport,
{
	/// Returns the IoCs façade.
	pub fn iocs(&self) -> Iocs<'_, C> {
		Iocs::new(self)
	}

	/// Returns the sparks façade.
	pub fn sparks(&self) -> Sparks<'_, C> {
		Sparks::new(self)
	}

	/// Returns the tags façade.
	pub fn tags(&self) -> Tags<'_, C> {
		Tags::new(self)
	}

	/// Returns the users façade.
	pub fn users(&self) -> Users<'_, C> {
		Users::new(self)
	}

	/// Returns the crawl façade.
	pub fn crawl(&self) -> Crawl<'_, C> {
		Crawl::new(self)
	}

	/// Returns the malwares façade.
	pub fn malwares(&self) -> Malwares<'_, C> {
		Malwares::new(self)
	}
}
