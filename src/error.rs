//! Client-level error types shared by the token exchanger, sessions, and resource operations.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Programmatic error categories, stable across every operation in the crate.
///
/// Match on [`Error::kind`] instead of message text when implementing retry policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Network, DNS, TLS, or timeout failure before a response was received.
	Transport,
	/// Token endpoint answered with a non-200 status.
	AuthExchange,
	/// Response body was not valid JSON for the expected shape.
	Parse,
	/// Response body was empty or could not be read.
	Read,
	/// HTTP 401 from a resource endpoint.
	Unauthorized,
	/// Requested user, vehicle, or other resource does not exist.
	ResourceNotFound,
	/// Request payload was rejected by the API.
	Validation,
	/// Vendor name was not recognized by the API.
	UnknownVendor,
	/// Account has reached its connection limit.
	ConnectionLimitReached,
	/// Upstream gateway failed to transfer the request.
	Transfer,
	/// HTTP 500 or any status without a dedicated mapping.
	GeneralServerError,
	/// Local configuration problem (bad URL, missing runtime, unbuildable request).
	Config,
}
impl ErrorKind {
	/// Returns a stable label suitable for logs or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Transport => "transport",
			Self::AuthExchange => "auth_exchange",
			Self::Parse => "parse",
			Self::Read => "read",
			Self::Unauthorized => "unauthorized",
			Self::ResourceNotFound => "resource_not_found",
			Self::Validation => "validation",
			Self::UnknownVendor => "unknown_vendor",
			Self::ConnectionLimitReached => "connection_limit_reached",
			Self::Transfer => "transfer",
			Self::GeneralServerError => "general_server_error",
			Self::Config => "config",
		}
	}

	/// Returns `true` for failures that may succeed when retried unchanged.
	pub const fn is_retryable(self) -> bool {
		matches!(self, Self::Transport | Self::Transfer | Self::GeneralServerError)
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint rejected or garbled the client-credentials exchange.
	#[error(transparent)]
	AuthExchange(#[from] AuthExchangeError),
	/// Resource endpoint failure classified by [`crate::response::classify`].
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns the programmatic category of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Transport(_) => ErrorKind::Transport,
			Self::AuthExchange(AuthExchangeError::Parse { .. }) => ErrorKind::Parse,
			Self::AuthExchange(_) => ErrorKind::AuthExchange,
			Self::Api(e) => e.kind,
			Self::Config(_) => ErrorKind::Config,
		}
	}

	/// Returns the HTTP status code attached to the failure, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::AuthExchange(e) => e.status(),
			Self::Api(e) => e.status,
			_ => None,
		}
	}
}

/// Failures of the OAuth 2.0 client-credentials exchange.
///
/// Every variant keeps the raw response body so callers can log what the token endpoint said.
#[derive(Debug, ThisError)]
pub enum AuthExchangeError {
	/// Token endpoint answered HTTP 401.
	#[error("Token endpoint rejected the client as unauthorized: {status_line}.")]
	Unauthorized {
		/// Verbatim HTTP status line, e.g. `401 Unauthorized`.
		status_line: String,
		/// Raw response body.
		body: String,
	},
	/// Token endpoint answered any other non-200 status.
	#[error("Token endpoint returned an unexpected response: {status_line}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Verbatim HTTP status line.
		status_line: String,
		/// Raw response body.
		body: String,
	},
	/// Token endpoint answered 200 with a body that is not a token response.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// Raw response body.
		body: String,
	},
}
impl AuthExchangeError {
	/// Returns the HTTP status code of the failed exchange.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Unauthorized { .. } => Some(401),
			Self::Rejected { status, .. } => Some(*status),
			Self::Parse { .. } => Some(200),
		}
	}

	/// Returns the raw response body returned by the token endpoint.
	pub fn body(&self) -> &str {
		match self {
			Self::Unauthorized { body, .. }
			| Self::Rejected { body, .. }
			| Self::Parse { body, .. } => body,
		}
	}
}

/// Classified resource endpoint failure.
///
/// `message` is the endpoint-specific category text; `detail` is the verbatim HTTP status line
/// for status failures, or the read/parse diagnostic for body failures.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{message}\n{detail}")]
pub struct ApiError {
	/// Programmatic category.
	pub kind: ErrorKind,
	/// Human-readable, endpoint-specific category message.
	pub message: String,
	/// Status line or body diagnostic.
	pub detail: String,
	/// HTTP status code of the response.
	pub status: Option<u16>,
	/// Retry-After hint supplied by the API, if any.
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Creates a new error without a status code or retry hint.
	pub fn new(kind: ErrorKind, message: impl Into<String>, detail: impl Into<String>) -> Self {
		Self { kind, message: message.into(), detail: detail.into(), status: None, retry_after: None }
	}

	/// Attaches the HTTP status code.
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);

		self
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}
}

/// Configuration and validation failures raised locally.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// An environment resolved to an unusable URL.
	#[error("Environment resolved to an invalid URL.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// API base URL cannot carry path segments.
	#[error("API base URL `{url}` cannot be used as a base for resource paths.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// Environment name is neither a known environment nor an absolute URL.
	#[error("Unknown environment `{value}`; expected sandbox, production, or an absolute URL.")]
	UnknownEnvironment {
		/// Unrecognized input.
		value: String,
	},
	/// Required environment variable is not set.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// Request payload could not be serialized.
	#[error("Request payload could not be serialized.")]
	Payload(#[from] serde_json::Error),
	/// Background refresh needs a Tokio runtime and none is running.
	#[error("Automatic token refresh requires a running Tokio runtime.")]
	NoRuntime,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, deadlines).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// Request did not complete before its deadline.
	#[error("Request timed out before the API responded.")]
	Timeout {
		/// Session-level deadline that elapsed, when the session enforced it.
		timeout: Option<Duration>,
	},
	/// Transport failed without a structured error.
	#[error("HTTP client error occurred while calling the API: {message}.")]
	Other {
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_display_joins_message_and_status_line() {
		let err = ApiError::new(ErrorKind::ResourceNotFound, "no such user", "404 Not Found")
			.with_status(404);

		assert_eq!(err.to_string(), "no such user\n404 Not Found");
		assert_eq!(Error::from(err).kind(), ErrorKind::ResourceNotFound);
	}

	#[test]
	fn exchange_parse_failures_report_parse_kind() {
		let body = "{not json";
		let source = serde_path_to_error::deserialize::<_, serde_json::Value>(
			&mut serde_json::Deserializer::from_str(body),
		)
		.expect_err("Malformed JSON fixture must fail to parse.");
		let err = Error::from(AuthExchangeError::Parse { source, body: body.into() });

		assert_eq!(err.kind(), ErrorKind::Parse);
		assert_eq!(err.status(), Some(200));
	}

	#[test]
	fn retryable_kinds_are_transient_only() {
		assert!(ErrorKind::Transport.is_retryable());
		assert!(ErrorKind::Transfer.is_retryable());
		assert!(!ErrorKind::Unauthorized.is_retryable());
		assert!(!ErrorKind::Parse.is_retryable());
	}
}
