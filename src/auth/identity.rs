//! Client identity resolved once per dispatcher.

// self
use crate::{
	_prelude::*,
	auth::ApiToken,
	config::Settings,
	error::{CallerError, ConfigError},
};

/// Where the identity's token came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenSource {
	/// Token passed explicitly when the dispatcher was built.
	Explicit,
	/// Token taken from [`Settings::token`] (environment or default).
	Configured,
}

/// Token plus the authentication header attached to every request.
///
/// The header value is rendered from [`Settings::authorization_format`] at construction and is
/// never recomputed, so every call made by one dispatcher carries the same header.
#[derive(Clone)]
pub struct ClientIdentity {
	token: ApiToken,
	source: TokenSource,
	header_name: String,
	header_value: ApiToken,
}
impl ClientIdentity {
	/// Builds the identity from settings and an optional explicit token.
	///
	/// Empty explicit tokens count as absent and fall back to the configured token. A rendered
	/// header value that HTTP cannot carry is a [`CallerError::InvalidToken`] for an explicit
	/// token and a [`ConfigError::InvalidHeaderValue`] for the configured one.
	pub fn from_settings(settings: &Settings, explicit: Option<&str>) -> Result<Self> {
		let (token, source) = match explicit.filter(|value| !value.is_empty()) {
			Some(value) => (ApiToken::new(value), TokenSource::Explicit),
			None => (settings.token.clone(), TokenSource::Configured),
		};
		let rendered = render_authorization(&settings.authorization_format, token.expose());

		if !is_header_value(&rendered) {
			return Err(match source {
				TokenSource::Explicit => CallerError::InvalidToken.into(),
				TokenSource::Configured => ConfigError::InvalidHeaderValue {
					header: settings.authorization_header.clone(),
				}
				.into(),
			});
		}

		Ok(Self {
			token,
			source,
			header_name: settings.authorization_header.clone(),
			header_value: ApiToken::new(rendered),
		})
	}

	/// Returns the token used to render the header.
	pub fn token(&self) -> &ApiToken {
		&self.token
	}

	/// Returns whether the token was explicit or configured.
	pub fn source(&self) -> TokenSource {
		self.source
	}

	/// Returns the authentication header name.
	pub fn header_name(&self) -> &str {
		&self.header_name
	}

	/// Returns the rendered header value. Callers must avoid logging this string.
	pub fn header_value(&self) -> &str {
		self.header_value.expose()
	}
}
impl Debug for ClientIdentity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientIdentity")
			.field("source", &self.source)
			.field("header_name", &self.header_name)
			.field("header_value", &self.header_value)
			.finish()
	}
}

/// Substitutes the token into the first `%s` placeholder of `format`.
pub(crate) fn render_authorization(format: &str, token: &str) -> String {
	format.replacen(crate::config::TOKEN_PLACEHOLDER, token, 1)
}

/// Returns `true` when `value` only holds visible ASCII, spaces, and tabs.
pub(crate) fn is_header_value(value: &str) -> bool {
	value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b))
}
