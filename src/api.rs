//! Typed resource operations.
//!
//! Every operation is a method on [`Session`]: it builds one request, sends it through
//! [`Session::send`], and maps the response through [`crate::response`] with an
//! endpoint-specific [`ResponseTable`](crate::response::ResponseTable).

pub mod actions;
pub mod devices;
pub mod language;
pub mod users;
pub mod vehicles;
pub mod vendors;

pub use actions::*;
pub use devices::*;
pub use language::*;
pub use users::*;
pub use vehicles::*;
pub use vendors::*;

// crates.io
use oauth2::http::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ConfigError},
	http::{ApiHttpClient, HttpResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
	response::{self, ResponseTable},
	session::Session,
};

/// `{"data": [...]}` envelope returned by list endpoints.
#[derive(Debug, Deserialize)]
struct Page<T> {
	data: Vec<T>,
}
impl<T> Page<T> {
	fn into_map(self, key: impl Fn(&T) -> &str) -> HashMap<String, T> {
		self.data.into_iter().map(|item| (key(&item).to_owned(), item)).collect()
	}
}

impl<C> Session<C>
where
	C: ApiHttpClient,
{
	async fn call<T, F>(
		&self,
		stage: &'static str,
		method: Method,
		segments: &[&str],
		body: Option<Vec<u8>>,
		interpret: F,
	) -> Result<T>
	where
		F: FnOnce(&HttpResponse) -> Result<T, ApiError>,
	{
		const KIND: CallKind = CallKind::Resource;

		let span = CallSpan::new(KIND, stage);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.send(method, segments, body).await?;

				interpret(&response).map_err(Error::from)
			})
			.await;

		obs::record_call_outcome(KIND, CallOutcome::of(&result));

		result
	}

	async fn fetch<T>(
		&self,
		stage: &'static str,
		method: Method,
		segments: &[&str],
		body: Option<Vec<u8>>,
		table: &ResponseTable,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		self.call(stage, method, segments, body, |reply| response::classify_json(reply, table))
			.await
	}

	async fn execute(
		&self,
		stage: &'static str,
		method: Method,
		segments: &[&str],
		table: &ResponseTable,
	) -> Result<()> {
		self.call(stage, method, segments, None, |reply| response::classify_empty(reply, table))
			.await
	}
}

fn json_body<T>(payload: &T) -> Result<Vec<u8>>
where
	T: ?Sized + Serialize,
{
	Ok(serde_json::to_vec(payload).map_err(ConfigError::from)?)
}
