//! Pluggable mapping from [`Environment`] to concrete endpoints.

// self
use crate::{
	_prelude::*,
	environment::{Environment, ResolvedEnvironment, append_segments},
	error::ConfigError,
};

const TOKEN_PATH: [&str; 2] = ["oauth2", "token"];
const API_LABEL: &str = "enode-api";
const OAUTH_LABEL: &str = "oauth";

/// Resolves an [`Environment`] into the endpoints a session uses.
///
/// Any `Fn(&Environment) -> Result<ResolvedEnvironment, ConfigError>` closure is a resolver.
pub trait EnvironmentResolver
where
	Self: 'static + Send + Sync,
{
	/// Produces the API base URL and token endpoint for `environment`.
	fn resolve(&self, environment: &Environment) -> Result<ResolvedEnvironment, ConfigError>;
}
impl<F> EnvironmentResolver for F
where
	F: 'static + Send + Sync + Fn(&Environment) -> Result<ResolvedEnvironment, ConfigError>,
{
	fn resolve(&self, environment: &Environment) -> Result<ResolvedEnvironment, ConfigError> {
		self(environment)
	}
}

/// Default resolver using the hosted subdomain layout.
///
/// Named environments map to `https://enode-api.{env}.enode.io` and
/// `https://oauth.{env}.enode.io/oauth2/token`. A custom base URL serves both roles, with the
/// token endpoint at `{base}/oauth2/token`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SubdomainResolver;
impl EnvironmentResolver for SubdomainResolver {
	fn resolve(&self, environment: &Environment) -> Result<ResolvedEnvironment, ConfigError> {
		match environment {
			Environment::Custom(base) => Ok(ResolvedEnvironment {
				api_base: base.clone(),
				token_endpoint: append_segments(base, &TOKEN_PATH)?,
			}),
			named => {
				let label = named.label().unwrap_or_default();

				Ok(ResolvedEnvironment {
					api_base: parse(&format!("https://{API_LABEL}.{label}.enode.io"))?,
					token_endpoint: parse(&format!(
						"https://{OAUTH_LABEL}.{label}.enode.io/oauth2/token"
					))?,
				})
			},
		}
	}
}

/// Resolver that derives the OAuth host from the API host.
///
/// The API base is resolved by [`SubdomainResolver`]; when its host starts with the
/// `enode-api` label, that label is swapped for `oauth` to form the token host. Hosts without
/// the label keep the custom-base behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostRewriteResolver;
impl EnvironmentResolver for HostRewriteResolver {
	fn resolve(&self, environment: &Environment) -> Result<ResolvedEnvironment, ConfigError> {
		let resolved = SubdomainResolver.resolve(environment)?;
		let Some(rest) = resolved
			.api_base
			.host_str()
			.and_then(|host| host.strip_prefix(API_LABEL))
			.and_then(|rest| rest.strip_prefix('.'))
		else {
			return Ok(resolved);
		};
		let mut oauth_base = resolved.api_base.clone();

		oauth_base
			.set_host(Some(&format!("{OAUTH_LABEL}.{rest}")))
			.map_err(|source| ConfigError::InvalidUrl { source })?;
		oauth_base.set_path("");

		Ok(ResolvedEnvironment {
			token_endpoint: append_segments(&oauth_base, &TOKEN_PATH)?,
			api_base: resolved.api_base,
		})
	}
}

fn parse(raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidUrl { source })
}
