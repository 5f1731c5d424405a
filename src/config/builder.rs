// self
use crate::{
	_prelude::*,
	auth::{ApiToken, identity},
	config::{
		DEFAULT_AUTHORIZATION_FORMAT, DEFAULT_AUTHORIZATION_HEADER, DEFAULT_ORIGIN, DEFAULT_TOKEN,
		DEFAULT_VERSION, PATH_SETTINGS, ResourcePaths, Settings, TOKEN_PLACEHOLDER,
	},
	error::ConfigError,
};

/// Builder for [`Settings`] values.
#[derive(Debug)]
pub struct SettingsBuilder {
	/// API version; only used to derive the default base URL.
	pub version: String,
	/// Explicit base URL; derived from [`Self::version`] when absent.
	pub base_url: Option<String>,
	/// Token used when no explicit token is given to the dispatcher.
	pub token: ApiToken,
	/// Authentication header name.
	pub authorization_header: String,
	/// Authentication header value format.
	pub authorization_format: String,
	/// Resource path fragments.
	pub paths: ResourcePaths,
}
impl SettingsBuilder {
	/// Creates a builder seeded with the hardcoded defaults.
	pub fn new() -> Self {
		Self {
			version: DEFAULT_VERSION.into(),
			base_url: None,
			token: ApiToken::new(DEFAULT_TOKEN),
			authorization_header: DEFAULT_AUTHORIZATION_HEADER.into(),
			authorization_format: DEFAULT_AUTHORIZATION_FORMAT.into(),
			paths: ResourcePaths::default(),
		}
	}

	/// Sets the API version.
	pub fn version(mut self, version: impl Into<String>) -> Self {
		self.version = version.into();

		self
	}

	/// Sets an explicit base URL, bypassing the version-derived default.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());

		self
	}

	/// Sets the configured token.
	pub fn token(mut self, token: impl Into<String>) -> Self {
		self.token = ApiToken::new(token);

		self
	}

	/// Sets the authentication header name.
	pub fn authorization_header(mut self, name: impl Into<String>) -> Self {
		self.authorization_header = name.into();

		self
	}

	/// Sets the authentication header value format.
	pub fn authorization_format(mut self, format: impl Into<String>) -> Self {
		self.authorization_format = format.into();

		self
	}

	/// Replaces every resource path fragment.
	pub fn paths(mut self, paths: ResourcePaths) -> Self {
		self.paths = paths;

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<Settings, ConfigError> {
		let raw_base = self
			.base_url
			.unwrap_or_else(|| format!("{DEFAULT_ORIGIN}/api/{}", self.version));
		let base_url = Url::parse(&raw_base)
			.map_err(|source| ConfigError::InvalidBaseUrl { value: raw_base.clone(), source })?;

		validate_scheme(&base_url)?;
		validate_header_name(&self.authorization_header)?;
		validate_format(&self.authorization_format)?;
		validate_header_value(
			&self.authorization_header,
			&self.authorization_format,
			&self.token,
		)?;

		let mut paths = self.paths;

		for setting in PATH_SETTINGS {
			validate_fragment(setting.name, (setting.field)(&mut paths))?;
		}

		Ok(Settings {
			version: self.version,
			base_url,
			token: self.token,
			authorization_header: self.authorization_header,
			authorization_format: self.authorization_format,
			paths,
		})
	}
}
impl Default for SettingsBuilder {
	fn default() -> Self {
		Self::new()
	}
}

fn validate_scheme(url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { url: url.to_string() }),
	}
}

// RFC 9110 `token` characters.
fn validate_header_name(name: &str) -> Result<(), ConfigError> {
	let valid = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));

	if valid { Ok(()) } else { Err(ConfigError::InvalidHeaderName { name: name.into() }) }
}

fn validate_format(format: &str) -> Result<(), ConfigError> {
	if format.matches(TOKEN_PLACEHOLDER).count() == 1 {
		Ok(())
	} else {
		Err(ConfigError::InvalidAuthorizationFormat { format: format.into() })
	}
}

fn validate_header_value(
	header: &str,
	format: &str,
	token: &ApiToken,
) -> Result<(), ConfigError> {
	let rendered = identity::render_authorization(format, token.expose());

	if identity::is_header_value(&rendered) {
		Ok(())
	} else {
		Err(ConfigError::InvalidHeaderValue { header: header.into() })
	}
}

fn validate_fragment(setting: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.starts_with('/') {
		Ok(())
	} else {
		Err(ConfigError::InvalidPathFragment { setting, value: value.into() })
	}
}
