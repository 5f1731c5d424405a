//! API token wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted API token keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);
impl ApiToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` when the token holds no characters.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for ApiToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for ApiToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiToken").field(&"<redacted>").finish()
	}
}
impl Display for ApiToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
