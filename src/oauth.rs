//! OAuth 2.0 client-credentials exchange against the API's token endpoint.
//!
//! The exchange is a single `POST` with HTTP Basic client authentication. Responses are parsed
//! leniently: `expires_in` may arrive as an integer, a float, or a numeric string, and anything
//! unusable becomes `0`, which only disables refresh scheduling.

pub use oauth2;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::http::{
	Method, Request, StatusCode,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use serde::Deserializer;
use serde_json::Value;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::Credentials,
	error::{AuthExchangeError, ConfigError},
	http::{self, ApiHttpClient, HttpRequest},
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Grant type sent in every exchange.
pub const GRANT_TYPE: &str = "client_credentials";

/// Successful token endpoint response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
	/// Issued bearer token.
	pub access_token: String,
	/// Token type, normally `Bearer`.
	#[serde(default, deserialize_with = "string_or_default")]
	pub token_type: String,
	/// Granted scope string.
	#[serde(default, deserialize_with = "string_or_default")]
	pub scope: String,
	/// Lifetime in seconds; `0` when missing or unparseable.
	#[serde(default, deserialize_with = "lenient_seconds")]
	pub expires_in: i64,
}
impl TokenResponse {
	/// Returns the lifetime when it is positive.
	pub fn lifetime(&self) -> Option<Duration> {
		u64::try_from(self.expires_in).ok().filter(|secs| *secs > 0).map(Duration::from_secs)
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("expires_in", &self.expires_in)
			.finish()
	}
}

/// Exchanges client credentials for an access token.
///
/// - `200` parses the body into a [`TokenResponse`]; malformed JSON fails with
///   [`AuthExchangeError::Parse`].
/// - `401` fails with [`AuthExchangeError::Unauthorized`].
/// - Any other status fails with [`AuthExchangeError::Rejected`].
///
/// No retries are attempted.
pub async fn exchange<C>(
	http_client: &C,
	credentials: &Credentials,
	token_endpoint: &Url,
) -> Result<TokenResponse>
where
	C: ?Sized + ApiHttpClient,
{
	exchange_as(CallKind::TokenExchange, http_client, credentials, token_endpoint).await
}

pub(crate) async fn exchange_as<C>(
	kind: CallKind,
	http_client: &C,
	credentials: &Credentials,
	token_endpoint: &Url,
) -> Result<TokenResponse>
where
	C: ?Sized + ApiHttpClient,
{
	let span = CallSpan::new(kind, "exchange");

	obs::record_call_outcome(kind, CallOutcome::Attempt);

	let result = span
		.instrument(async move {
			let request = token_request(credentials, token_endpoint)?;
			let response =
				http_client.execute(request).await.map_err(http::map_transport_error::<C>)?;

			parse_token_response(&response)
		})
		.await;

	obs::record_call_outcome(kind, CallOutcome::of(&result));

	result
}

/// Builds the token request for `credentials`.
pub fn token_request(credentials: &Credentials, token_endpoint: &Url) -> Result<HttpRequest> {
	let body = form_urlencoded::Serializer::new(String::new())
		.append_pair("grant_type", GRANT_TYPE)
		.finish();
	let basic = STANDARD.encode(format!(
		"{}:{}",
		credentials.client_id(),
		credentials.client_secret().expose()
	));

	Request::builder()
		.method(Method::POST)
		.uri(token_endpoint.as_str())
		.header(CONTENT_TYPE, "application/x-www-form-urlencoded")
		.header(ACCEPT, "application/json")
		.header(AUTHORIZATION, format!("Basic {basic}"))
		.body(body.into_bytes())
		.map_err(|e| ConfigError::from(e).into())
}

/// Interprets a token endpoint response.
pub fn parse_token_response(response: &http::HttpResponse) -> Result<TokenResponse> {
	let body = String::from_utf8_lossy(response.body()).into_owned();

	match response.status() {
		StatusCode::OK => {
			let mut deserializer = serde_json::Deserializer::from_slice(response.body());

			serde_path_to_error::deserialize(&mut deserializer)
				.map_err(|source| AuthExchangeError::Parse { source, body }.into())
		},
		StatusCode::UNAUTHORIZED =>
			Err(AuthExchangeError::Unauthorized { status_line: http::status_line(response), body }
				.into()),
		status => Err(AuthExchangeError::Rejected {
			status: status.as_u16(),
			status_line: http::status_line(response),
			body,
		}
		.into()),
	}
}

fn string_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	let secs = match Option::<Value>::deserialize(deserializer)? {
		Some(Value::Number(number)) => number.as_i64().or_else(|| number.as_f64().and_then(truncate)),
		Some(Value::String(raw)) => {
			let raw = raw.trim();

			raw.parse::<i64>().ok().or_else(|| raw.parse::<f64>().ok().and_then(truncate))
		},
		_ => None,
	};

	Ok(secs.unwrap_or(0))
}

fn truncate(value: f64) -> Option<i64> {
	value.is_finite().then(|| value.trunc() as i64)
}
