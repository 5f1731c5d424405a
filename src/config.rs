//! Client settings resolved once from environment overrides and hardcoded defaults.
//!
//! [`Settings::from_env`] is the only place that reads the process environment. Everything
//! downstream receives a validated [`Settings`] value, so nothing deep in the call stack
//! consults global state. [`Settings::from_lookup`] resolves the same settings from any key
//! lookup, which keeps tests away from the real environment.

/// Builder API for assembling settings.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::ApiToken, error::ConfigError};

/// Placeholder replaced by the token inside [`Settings::authorization_format`].
pub const TOKEN_PLACEHOLDER: &str = "%s";
/// Service origin used when no base URL override is present.
pub const DEFAULT_ORIGIN: &str = "https://community.blueliv.com";
/// API version used when no override is present.
pub const DEFAULT_VERSION: &str = "v1";
/// Token used when neither an explicit nor an environment token exists.
pub const DEFAULT_TOKEN: &str = "invalid-token";
/// Default authentication header name.
pub const DEFAULT_AUTHORIZATION_HEADER: &str = "Authorization";
/// Default authentication header value format.
pub const DEFAULT_AUTHORIZATION_FORMAT: &str = "Token %s";

/// Environment variable names recognized by [`Settings::from_env`].
pub mod env {
	/// Overrides [`super::Settings::version`].
	pub const VERSION: &str = "BLUELIV_API_VERSION";
	/// Overrides [`super::Settings::token`].
	pub const TOKEN: &str = "BLUELIV_API_TOKEN";
	/// Overrides [`super::Settings::base_url`].
	pub const BASE_URL: &str = "BLUELIV_API_BASEURL";
	/// Overrides [`super::Settings::authorization_header`].
	pub const AUTHORIZATION_HEADER: &str = "BLUELIV_API_AUTHORIZATION_HEADER";
	/// Overrides [`super::Settings::authorization_format`].
	pub const AUTHORIZATION_FORMAT: &str = "BLUELIV_API_AUTHORIZATION_FORMAT";
}

/// Path fragments appended to the base URL, one per resource family and sub-resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePaths {
	/// Sparks collection.
	pub sparks: String,
	/// Sparks timeline, appended to [`Self::sparks`].
	pub sparks_timeline: String,
	/// Sparks discovery feed, appended to [`Self::sparks`].
	pub sparks_discover: String,
	/// IoCs under one spark, appended to `sparks/<id>`.
	pub sparks_iocs: String,
	/// IoCs collection.
	pub iocs: String,
	/// IoC type catalogue; a full resource path, not a suffix.
	pub iocs_types: String,
	/// IoCs timeline, appended to [`Self::iocs`].
	pub iocs_timeline: String,
	/// IoCs discovery feed, appended to [`Self::iocs`].
	pub iocs_discover: String,
	/// Tags collection.
	pub tags: String,
	/// Sparks under one tag, appended to `tags/<slug>`.
	pub tags_sparks: String,
	/// IoCs under one tag, appended to `tags/<slug>`.
	pub tags_iocs: String,
	/// Users collection.
	pub users: String,
	/// Sparks of one user, appended to `users/<name>`.
	pub users_sparks: String,
	/// IoCs of one user, appended to `users/<name>`.
	pub users_iocs: String,
	/// Crawl submission endpoint.
	pub crawl: String,
	/// Malware collection.
	pub malwares: String,
	/// Malware sample upload, appended to [`Self::malwares`].
	pub malwares_upload: String,
	/// Shared search endpoint; the category is appended as a segment.
	pub search: String,
}
impl Default for ResourcePaths {
	fn default() -> Self {
		Self {
			sparks: "/sparks".into(),
			sparks_timeline: "/timeline".into(),
			sparks_discover: "/discover".into(),
			sparks_iocs: "/iocs".into(),
			iocs: "/iocs".into(),
			iocs_types: "/iocs/types".into(),
			iocs_timeline: "/timeline".into(),
			iocs_discover: "/discover".into(),
			tags: "/tags".into(),
			tags_sparks: "/sparks".into(),
			tags_iocs: "/iocs".into(),
			users: "/users".into(),
			users_sparks: "/sparks".into(),
			users_iocs: "/iocs".into(),
			crawl: "/crawl".into(),
			malwares: "/malwares".into(),
			malwares_upload: "/upload".into(),
			search: "/search".into(),
		}
	}
}

/// One overridable path fragment: its setting name, environment variable, and field.
#[derive(Clone, Copy)]
pub struct PathSetting {
	/// Stable setting name used in validation errors.
	pub name: &'static str,
	/// Environment variable overriding the fragment.
	pub env: &'static str,
	/// Accessor for the fragment inside [`ResourcePaths`].
	pub field: fn(&mut ResourcePaths) -> &mut String,
}
impl Debug for PathSetting {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PathSetting").field("name", &self.name).field("env", &self.env).finish()
	}
}

/// Every path fragment recognized by the client.
pub const PATH_SETTINGS: [PathSetting; 18] = [
	PathSetting { name: "sparks", env: "BLUELIV_API_BASE_SPARKS_URL", field: |p| &mut p.sparks },
	PathSetting {
		name: "sparks_timeline",
		env: "BLUELIV_API_BASE_SPARKS_TIMELINE_URL",
		field: |p| &mut p.sparks_timeline,
	},
	PathSetting {
		name: "sparks_discover",
		env: "BLUELIV_API_BASE_SPARKS_DISCOVER_URL",
		field: |p| &mut p.sparks_discover,
	},
	PathSetting {
		name: "sparks_iocs",
		env: "BLUELIV_API_BASE_SPARKS_IOCS_URL",
		field: |p| &mut p.sparks_iocs,
	},
	PathSetting { name: "iocs", env: "BLUELIV_API_BASE_IOCS_URL", field: |p| &mut p.iocs },
	PathSetting {
		name: "iocs_types",
		env: "BLUELIV_API_BASE_IOCS_TYPES_URL",
		field: |p| &mut p.iocs_types,
	},
	PathSetting {
		name: "iocs_timeline",
		env: "BLUELIV_API_BASE_IOCS_TIMELINE_URL",
		field: |p| &mut p.iocs_timeline,
	},
	PathSetting {
		name: "iocs_discover",
		env: "BLUELIV_API_BASE_IOCS_DISCOVER_URL",
		field: |p| &mut p.iocs_discover,
	},
	PathSetting { name: "tags", env: "BLUELIV_API_BASE_TAGS_URL", field: |p| &mut p.tags },
	PathSetting {
		name: "tags_sparks",
		env: "BLUELIV_API_BASE_TAGS_SPARKS_URL",
		field: |p| &mut p.tags_sparks,
	},
	PathSetting {
		name: "tags_iocs",
		env: "BLUELIV_API_BASE_TAGS_IOCS_URL",
		field: |p| &mut p.tags_iocs,
	},
	PathSetting { name: "users", env: "BLUELIV_API_BASE_USERS_URL", field: |p| &mut p.users },
	PathSetting {
		name: "users_sparks",
		env: "BLUELIV_API_BASE_USERS_SPARKS_URL",
		field: |p| &mut p.users_sparks,
	},
	PathSetting {
		name: "users_iocs",
		env: "BLUELIV_API_BASE_USERS_IOCS_URL",
		field: |p| &mut p.users_iocs,
	},
	PathSetting { name: "crawl", env: "BLUELIV_API_BASE_CRAWL_URL", field: |p| &mut p.crawl },
	PathSetting {
		name: "malwares",
		env: "BLUELIV_API_BASE_MALWARES_URL",
		field: |p| &mut p.malwares,
	},
	PathSetting {
		name: "malwares_upload",
		env: "BLUELIV_API_BASE_MALWARES_UPLOAD_URL",
		field: |p| &mut p.malwares_upload,
	},
	PathSetting { name: "search", env: "BLUELIV_API_BASE_SEARCH_URL", field: |p| &mut p.search },
];

/// Validated client settings consumed by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
	/// API version, embedded in the default base URL.
	pub version: String,
	/// Base URL every resource path is appended to.
	pub base_url: Url,
	/// Token used when the dispatcher is built without an explicit one.
	pub token: ApiToken,
	/// Authentication header name.
	pub authorization_header: String,
	/// Authentication header value format containing one [`TOKEN_PLACEHOLDER`].
	pub authorization_format: String,
	/// Resource path fragments.
	pub paths: ResourcePaths,
}
impl Settings {
	/// Creates a builder seeded with the hardcoded defaults.
	pub fn builder() -> SettingsBuilder {
		SettingsBuilder::new()
	}

	/// Resolves settings from the process environment, falling back to defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Resolves settings from an arbitrary key lookup, falling back to defaults.
	///
	/// Empty values count as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());
		let mut builder = SettingsBuilder::new();

		if let Some(version) = lookup(env::VERSION) {
			builder = builder.version(version);
		}
		if let Some(token) = lookup(env::TOKEN) {
			builder = builder.token(token);
		}
		if let Some(base_url) = lookup(env::BASE_URL) {
			builder = builder.base_url(base_url);
		}
		if let Some(header) = lookup(env::AUTHORIZATION_HEADER) {
			builder = builder.authorization_header(header);
		}
		if let Some(format) = lookup(env::AUTHORIZATION_FORMAT) {
			builder = builder.authorization_format(format);
		}

		for setting in PATH_SETTINGS {
			if let Some(value) = lookup(setting.env) {
				*(setting.field)(&mut builder.paths) = value;
			}
		}

		builder.build()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		move |key| map.get(key).cloned()
	}

	#[test]
	fn defaults_match_the_public_service() {
		let settings = Settings::from_lookup(|_| None).expect("Default settings should build.");

		assert_eq!(settings.version, "v1");
		assert_eq!(settings.base_url.as_str(), "https://community.blueliv.com/api/v1");
		assert_eq!(settings.token.expose(), "invalid-token");
		assert_eq!(settings.authorization_header, "Authorization");
		assert_eq!(settings.authorization_format, "Token %s");
		assert_eq!(settings.paths, ResourcePaths::default());
		assert_eq!(settings.paths.iocs_types, "/iocs/types");
		assert_eq!(settings.paths.search, "/search");
	}

	#[test]
	fn version_override_flows_into_default_base_url() {
		let settings = Settings::from_lookup(lookup_from(&[(env::VERSION, "v2")]))
			.expect("Versioned settings should build.");

		assert_eq!(settings.base_url.as_str(), "https://community.blueliv.com/api/v2");
	}

	#[test]
	fn base_url_override_wins_over_version() {
		let settings = Settings::from_lookup(lookup_from(&[
			(env::VERSION, "v2"),
			(env::BASE_URL, "http://localhost:8080/api/test"),
		]))
		.expect("Overridden settings should build.");

		assert_eq!(settings.version, "v2");
		assert_eq!(settings.base_url.as_str(), "http://localhost:8080/api/test");
	}

	#[test]
	fn path_overrides_apply_per_fragment() {
		let settings = Settings::from_lookup(lookup_from(&[
			("BLUELIV_API_BASE_SPARKS_URL", "/posts"),
			("BLUELIV_API_BASE_SEARCH_URL", "/find"),
		]))
		.expect("Path overrides should build.");

		assert_eq!(settings.paths.sparks, "/posts");
		assert_eq!(settings.paths.search, "/find");
		assert_eq!(settings.paths.tags, "/tags");
	}

	#[test]
	fn empty_values_count_as_unset() {
		let settings = Settings::from_lookup(lookup_from(&[(env::TOKEN, "")]))
			.expect("Empty overrides should build.");

		assert_eq!(settings.token.expose(), DEFAULT_TOKEN);
	}

	#[test]
	fn invalid_overrides_are_rejected() {
		let err = Settings::from_lookup(lookup_from(&[(env::AUTHORIZATION_FORMAT, "Token")]))
			.expect_err("Formats without a placeholder should fail.");

		assert!(matches!(err, ConfigError::InvalidAuthorizationFormat { .. }));

		let err = Settings::from_lookup(lookup_from(&[("BLUELIV_API_BASE_TAGS_URL", "tags")]))
			.expect_err("Relative path fragments should fail.");

		assert!(matches!(err, ConfigError::InvalidPathFragment { setting: "tags", .. }));
	}

	#[test]
	fn every_path_setting_has_a_distinct_env_var() {
		let mut seen = PATH_SETTINGS.iter().map(|setting| setting.env).collect::<Vec<_>>();

		seen.sort_unstable();
		seen.dedup();

		assert_eq!(seen.len(), PATH_SETTINGS.len());
	}
}
