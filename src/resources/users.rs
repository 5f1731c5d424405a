//! User profiles and the content they published.

// self
use crate::{
	_prelude::*,
	dispatch::{Dispatcher, OutputMode, RequestSpec, ResponseOutcome},
	http::HttpTransport,
	resources::{self, Page},
};

/// User endpoints.
pub struct Users<'a, C>
where
	C: ?Sized + HttpTransport,
{
	dispatcher: &'a Dispatcher<C>,
	output: OutputMode,
}
impl<'a, C> Users<'a, C>
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

	/// Returns the profile owning the dispatcher's token.
	pub fn me(&self) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;

		let resource = format!("{}/me", paths.users);

		self.dispatcher.dispatch(RequestSpec::get(resource).with_output(self.output))
	}

	/// Lists sparks published by `username`.
	pub fn sparks(&self, username: &str, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;
		let username = resources::path_segment(username)?;
		let resource = format!("{}/{username}{}", paths.users, paths.users_sparks);

		self.dispatcher.dispatch(page.apply(RequestSpec::get(resource)).with_output(self.output))
	}

	/// Lists IoCs published by `username`.
	pub fn iocs(&self, username: &str, page: Page) -> Result<ResponseOutcome> {
		let paths = &self.dispatcher.settings().paths;
		let username = resources::path_segment(username)?;
		let resource = format!("{}/{username}{}", paths.users, paths.users_iocs);

		self.dispatcher.dispatch(page.apply(RequestSpec::get(resource)).with_output(self.output))
	}
}
impl<C> Debug for Users<'_, C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Users").field("output", &self.output).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, error::CallerError, http::InboundResponse};

	#[test]
	fn me_returns_the_profile_in_text_mode() {
		let stub = StubTransport::default()
			.with_response(InboundResponse::new(200, r#"{"username":"patowc","karma":3}"#));
		let dispatcher = test_dispatcher(stub);
		let outcome = dispatcher
			.users()
			.with_output(OutputMode::Text)
			.me()
			.expect("Profile lookup should dispatch.");

		assert_eq!(
			outcome.payload().and_then(|payload| payload.as_text()),
			Some(r#"{"username": "patowc", "karma": 3}"#)
		);
		assert_eq!(
			dispatcher.last_url().map(String::from).as_deref(),
			Some("https://community.blueliv.com/api/v1/users/me")
		);
	}

	#[test]
	fn user_listings_nest_under_the_username() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher
			.users()
			.sparks("patowc", Page::new().with_limit(2))
			.expect("Sparks should dispatch.");

		assert_eq!(
			dispatcher.last_url().map(String::from).as_deref(),
			Some("https://community.blueliv.com/api/v1/users/patowc/sparks?limit=2")
		);

		dispatcher.users().iocs("patowc", Page::default()).expect("IoCs should dispatch.");

		assert_eq!(
			dispatcher.last_url().map(String::from).as_deref(),
			Some("https://community.blueliv.com/api/v1/users/patowc/iocs")
		);
	}

	#[test]
	fn usernames_cannot_escape_their_segment() {
		let dispatcher = test_dispatcher(StubTransport::default());

		dispatcher.users().sparks("42?x=1", Page::default()).expect("Sparks should dispatch.");

		assert_eq!(
			dispatcher.last_url().map(String::from).as_deref(),
			Some("https://community.blueliv.com/api/v1/users/42%3Fx%3D1/sparks")
		);

		dispatcher.users().iocs("../me", Page::default()).expect("IoCs should dispatch.");

		assert_eq!(
			dispatcher.last_url().map(String::from).as_deref(),
			Some("https://community.blueliv.com/api/v1/users/..%2Fme/iocs")
		);

		let err = dispatcher
			.users()
			.iocs("", Page::default())
			.expect_err("Empty usernames should be rejected.");

		assert!(matches!(err, Error::Caller(CallerError::InvalidPathSegment { .. })));
	}
}
