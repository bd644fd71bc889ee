//! Status-to-result classification shared by every resource operation.
//!
//! Each operation runs the same three stages, in order and without skipping any:
//!
//! 1. Status: the endpoint's [`StatusRule`] overrides are consulted first, then the base table
//!    (`200`/`204` succeed, `401` is [`ErrorKind::Unauthorized`], everything else is
//!    [`ErrorKind::GeneralServerError`]).
//! 2. Read: when a body is expected, an empty one is an [`ErrorKind::Read`] failure.
//! 3. Parse: [`decode`] turns the body into the typed model or an [`ErrorKind::Parse`] failure
//!    naming the offending JSON path.
//!
//! Status failures carry the verbatim status line (`404 Not Found`) as their detail.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ErrorKind},
	http::{self, HttpResponse},
};

/// Detail attached to read-stage failures.
pub const UNEXPECTED_EOF: &str = "unexpected end of input";

/// Result of [`classify`].
pub type ClassifiedResult = Result<Classified, ApiError>;

/// Successful classification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classified {
	/// Raw body ready for [`decode`].
	Body(Vec<u8>),
	/// Endpoint does not return a payload.
	Empty,
}

/// Whether the endpoint returns a JSON payload on success.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyExpectation {
	/// Body must be present and is decoded afterwards.
	Json,
	/// Body is ignored.
	None,
}

/// Messages attached to the base-table outcomes of one resource family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResourceMessages {
	/// Message for `401` responses.
	pub unauthorized: &'static str,
	/// Message for `500` and unmapped statuses.
	pub general: &'static str,
	/// Message for empty or unreadable bodies.
	pub read: &'static str,
	/// Message for bodies that fail to decode.
	pub parse: &'static str,
}

/// Endpoint-specific status mapping consulted before the base table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusRule {
	/// HTTP status code matched exactly.
	pub status: u16,
	/// Category reported for the status.
	pub kind: ErrorKind,
	/// Endpoint-specific message.
	pub message: &'static str,
}
impl StatusRule {
	/// Creates a rule mapping `status` to `kind`.
	pub const fn new(status: u16, kind: ErrorKind, message: &'static str) -> Self {
		Self { status, kind, message }
	}
}

/// Classification table for one endpoint: base messages plus override rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseTable {
	/// Messages for the base-table outcomes.
	pub messages: ResourceMessages,
	/// Rules checked before the base table; the first match wins.
	pub overrides: &'static [StatusRule],
}
impl ResponseTable {
	/// Creates a table without overrides.
	pub const fn new(messages: ResourceMessages) -> Self {
		Self { messages, overrides: &[] }
	}

	/// Replaces the override rules.
	pub const fn with_overrides(mut self, overrides: &'static [StatusRule]) -> Self {
		self.overrides = overrides;

		self
	}

	/// Returns the override rule for `status`, if any.
	pub fn rule(&self, status: u16) -> Option<&StatusRule> {
		self.overrides.iter().find(|rule| rule.status == status)
	}
}

/// Classifies a response. Pure: the same inputs always yield the same result.
pub fn classify(
	response: &HttpResponse,
	table: &ResponseTable,
	expect: BodyExpectation,
) -> ClassifiedResult {
	let status = response.status().as_u16();

	if let Some(rule) = table.rule(status) {
		return Err(status_error(response, rule.kind, rule.message));
	}

	match status {
		200 | 204 => (),
		401 => {
			return Err(status_error(response, ErrorKind::Unauthorized, table.messages.unauthorized));
		},
		_ => {
			return Err(status_error(
				response,
				ErrorKind::GeneralServerError,
				table.messages.general,
			));
		},
	}

	match expect {
		BodyExpectation::None => Ok(Classified::Empty),
		BodyExpectation::Json if response.body().trim_ascii().is_empty() =>
			Err(ApiError::new(ErrorKind::Read, table.messages.read, UNEXPECTED_EOF)
				.with_status(status)),
		BodyExpectation::Json => Ok(Classified::Body(response.body().clone())),
	}
}

/// Decodes a classified body into `T`.
///
/// [`Classified::Empty`] decodes like an empty body and fails at the read stage.
pub fn decode<T>(classified: &Classified, table: &ResponseTable) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	let body = match classified {
		Classified::Body(body) if !body.trim_ascii().is_empty() => body,
		_ => return Err(ApiError::new(ErrorKind::Read, table.messages.read, UNEXPECTED_EOF)),
	};
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| ApiError::new(ErrorKind::Parse, table.messages.parse, e.to_string()))
}

/// Runs all three stages for an endpoint returning JSON.
pub fn classify_json<T>(response: &HttpResponse, table: &ResponseTable) -> Result<T, ApiError>
where
	T: DeserializeOwned,
{
	let classified = classify(response, table, BodyExpectation::Json)?;

	decode(&classified, table).map_err(|e| e.with_status(response.status().as_u16()))
}

/// Runs the status stage for an endpoint without a payload.
pub fn classify_empty(response: &HttpResponse, table: &ResponseTable) -> Result<(), ApiError> {
	classify(response, table, BodyExpectation::None).map(|_| ())
}

fn status_error(response: &HttpResponse, kind: ErrorKind, message: &str) -> ApiError {
	ApiError::new(kind, message, http::status_line(response))
		.with_status(response.status().as_u16())
		.with_retry_after(http::parse_retry_after(response.headers()))
}
