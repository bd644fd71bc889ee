//! Typed async client for the Enode smart-energy API: client-credentials sessions that renew
//! themselves in the background, and one response classifier shared by every endpoint.
//!
//! # Quick Start
//!
//! ```no_run
//! use enode_client::{auth::Credentials, environment::Environment, session::Session};
//!
//! # async fn demo() -> enode_client::error::Result<()> {
//! let credentials = Credentials::new("client-id", "client-secret");
//! let session = Session::connect(credentials, Environment::Sandbox, true).await?;
//! let users = session.list_users().await?;
//!
//! println!("{} linked users.", users.len());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod environment;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod response;
pub mod session;

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::{Arc, Weak},
		time::Duration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
