//! Transport primitives for token exchanges and resource calls.
//!
//! The module exposes [`ApiHttpClient`], the session's only dependency on an HTTP stack. Requests
//! and responses use the `oauth2` crate's [`HttpRequest`]/[`HttpResponse`] aliases (plain
//! `http` types with `Vec<u8>` bodies) so custom transports and test doubles never need reqwest.

// crates.io
use oauth2::http::{HeaderMap, header::RETRY_AFTER};
pub use oauth2::{HttpClientError, HttpRequest, HttpResponse};
use time::format_description::well_known::Rfc2822;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, HttpClientError<E>>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing API requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by a session
/// and its background refresh task, and the futures they return must be `Send` so the refresh
/// loop can run on any Tokio worker.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes a single request and resolves to the full response, whatever its status.
	///
	/// Non-2xx statuses are not errors at this layer; only failures that prevent a response
	/// from being received are.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;

	/// Reports whether a transport error represents an elapsed deadline.
	fn is_timeout(_error: &Self::TransportError) -> bool {
		false
	}
}

/// Converts a transport failure into a client error.
pub(crate) fn map_transport_error<C>(error: HttpClientError<C::TransportError>) -> Error
where
	C: ?Sized + ApiHttpClient,
{
	match error {
		HttpClientError::Reqwest(inner) if C::is_timeout(&inner) =>
			TransportError::Timeout { timeout: None }.into(),
		HttpClientError::Reqwest(inner) => TransportError::Network { source: inner }.into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized transport failure".into() }.into(),
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The API answers directly, so configure any custom [`ReqwestClient`] without redirect
/// following to keep bearer tokens from leaking to another host.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.execute(request.try_into().map_err(Box::new)?)
				.await
				.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}

	fn is_timeout(error: &Self::TransportError) -> bool {
		error.is_timeout()
	}
}

/// Formats the status line the way HTTP/1.1 prints it, e.g. `404 Not Found`.
pub fn status_line(response: &HttpResponse) -> String {
	let status = response.status();

	match status.canonical_reason() {
		Some(reason) => format!("{} {reason}", status.as_u16()),
		None => status.as_u16().to_string(),
	}
}

/// Parses a `Retry-After` header given either as delta-seconds or as an HTTP date.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::from_secs(secs));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Duration::try_from(delta).ok();
		}
	}

	None
}
