//! API environments and the endpoints they resolve to.
//!
//! An [`Environment`] only names where the API lives. [`EnvironmentResolver`] implementations turn
//! it into a [`ResolvedEnvironment`] (the resource base URL plus the token endpoint) so hosting
//! conventions stay out of the session code.

pub mod resolver;

pub use resolver::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Deployment targeted by a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Environment {
	/// Shared sandbox deployment.
	Sandbox,
	/// Live production deployment.
	Production,
	/// Self-hosted or mocked deployment reachable under one base URL.
	Custom(Url),
}
impl Environment {
	/// Returns the subdomain label for the named deployments.
	pub const fn label(&self) -> Option<&'static str> {
		match self {
			Self::Sandbox => Some("sandbox"),
			Self::Production => Some("production"),
			Self::Custom(_) => None,
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Custom(base) => f.write_str(base.as_str()),
			named => f.write_str(named.label().unwrap_or_default()),
		}
	}
}
impl FromStr for Environment {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let value = s.trim();

		if value.eq_ignore_ascii_case("sandbox") {
			return Ok(Self::Sandbox);
		}
		if value.eq_ignore_ascii_case("production") {
			return Ok(Self::Production);
		}

		match Url::parse(value) {
			Ok(url) if url.has_host() && !url.cannot_be_a_base() => Ok(Self::Custom(url)),
			_ => Err(ConfigError::UnknownEnvironment { value: value.to_owned() }),
		}
	}
}
impl From<Url> for Environment {
	fn from(url: Url) -> Self {
		Self::Custom(url)
	}
}

/// Endpoints a session talks to once its environment is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedEnvironment {
	/// Base URL every resource path is appended to.
	pub api_base: Url,
	/// OAuth 2.0 token endpoint used for the client-credentials exchange.
	pub token_endpoint: Url,
}
impl ResolvedEnvironment {
	/// Builds a resource URL by appending percent-encoded path segments to the API base.
	pub fn resource_url(&self, segments: &[&str]) -> Result<Url, ConfigError> {
		append_segments(&self.api_base, segments)
	}
}

/// Appends path segments to `base`, dropping a trailing empty segment first.
pub(crate) fn append_segments(base: &Url, segments: &[&str]) -> Result<Url, ConfigError> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| ConfigError::CannotBeABase { url: base.to_string() })?
		.pop_if_empty()
		.extend(segments);

	Ok(url)
}
