//! Optional observability helpers for token exchanges and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `enode_client.call` with the `call` (kind)
//!   and `stage` (operation) fields, plus refresh lifecycle events.
//! - Enable `metrics` to increment the `enode_client_call_total` counter for every
//!   attempt/success/failure, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Kinds of outbound calls issued by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Initial client-credentials exchange.
	TokenExchange,
	/// Background or manual token refresh.
	TokenRefresh,
	/// Bearer-authenticated resource operation.
	Resource,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::TokenExchange => "token_exchange",
			CallKind::TokenRefresh => "token_refresh",
			CallKind::Resource => "resource",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Call issued.
	Attempt,
	/// Call classified as success.
	Success,
	/// Failure returned to the caller (or logged, for background refreshes).
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto its terminal outcome.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(_) => CallOutcome::Failure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
