//! Immutable access token snapshot swapped into sessions on every refresh.

// self
use crate::{_prelude::*, auth::TokenSecret, oauth::TokenResponse};

/// Access token issued by the token endpoint, as held by a session.
///
/// Snapshots are never mutated. A refresh builds a new `Token` and replaces the session's
/// `Arc<Token>` wholesale, so a reader always sees one coherent token.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	/// Bearer credential sent with every resource call.
	pub access_token: TokenSecret,
	/// Token type reported by the endpoint (normally `Bearer`).
	pub token_type: String,
	/// Space-delimited scope string granted to the client.
	pub scope: String,
	/// Lifetime reported at issuance, when it was usable.
	///
	/// Kept on the snapshot so [`Token::expires_at`] and the refresh schedule share one value.
	pub expires_in: Option<Duration>,
	/// Instant the exchange completed.
	pub issued_at: OffsetDateTime,
}
impl Token {
	/// Builds a snapshot from a token endpoint response received at `issued_at`.
	pub fn from_response(response: TokenResponse, issued_at: OffsetDateTime) -> Self {
		let expires_in = response.lifetime();

		Self {
			access_token: TokenSecret::new(response.access_token),
			token_type: response.token_type,
			scope: response.scope,
			expires_in,
			issued_at,
		}
	}

	/// Returns the instant the token stops being valid, when the lifetime is known.
	///
	/// Lifetimes reaching past the representable calendar yield `None`.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let lifetime = time::Duration::try_from(self.expires_in?).ok()?;

		self.issued_at.checked_add(lifetime)
	}

	/// Returns `true` when the token is known to be expired at `instant`.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at().is_some_and(|expires_at| instant >= expires_at)
	}

	/// Formats the `Authorization` header value for this token.
	pub(crate) fn bearer(&self) -> String {
		format!("Bearer {}", self.access_token.expose())
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("access_token", &self.access_token)
			.field("token_type", &self.token_type)
			.field("scope", &self.scope)
			.field("expires_in", &self.expires_in)
			.field("issued_at", &self.issued_at)
			.finish()
	}
}
