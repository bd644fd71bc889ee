//! Client credentials used for the client-credentials grant.

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Environment variable read by [`Credentials::from_env`] for the client identifier.
pub const CLIENT_ID_VAR: &str = "ENODE_CLIENT_ID";
/// Environment variable read by [`Credentials::from_env`] for the client secret.
pub const CLIENT_SECRET_VAR: &str = "ENODE_CLIENT_SECRET";

/// OAuth 2.0 client identifier and secret issued by the API.
///
/// Values are sent as-is (including empty strings); the token endpoint decides whether they are
/// acceptable.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	client_id: String,
	client_secret: TokenSecret,
}
impl Credentials {
	/// Creates credentials from an identifier and secret.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: TokenSecret::new(client_secret) }
	}

	/// Reads credentials from `ENODE_CLIENT_ID` and `ENODE_CLIENT_SECRET`.
	pub fn from_env() -> Result<Self, ConfigError> {
		let read = |name: &'static str| {
			env::var(name).map_err(|_| ConfigError::MissingVariable { name })
		};

		Ok(Self::new(read(CLIENT_ID_VAR)?, read(CLIENT_SECRET_VAR)?))
	}

	/// Returns the client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the client secret wrapper.
	pub fn client_secret(&self) -> &TokenSecret {
		&self.client_secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_output_redacts_secret() {
		let credentials = Credentials::new("client-123", "hunter2");
		let rendered = format!("{credentials:?}");

		assert!(rendered.contains("client-123"));
		assert!(!rendered.contains("hunter2"));
		assert_eq!(credentials.client_secret().expose(), "hunter2");
	}
}
