//! Authenticated sessions: token lifecycle plus the request primitive resource calls share.
//!
//! A [`Session`] is a cheap, clonable handle. All clones share one token slot, one refresh
//! guard, and at most one background refresh task. The token slot holds an `Arc<Token>` that
//! is replaced wholesale, so concurrent readers always observe a complete token while a
//! refresh is in flight.

pub mod refresh;

pub use refresh::*;

// crates.io
use oauth2::http::{
	HeaderValue, Method, Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use tokio::{runtime::Handle, task::JoinHandle};
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::{Credentials, Token},
	environment::{Environment, EnvironmentResolver, ResolvedEnvironment, SubdomainResolver},
	error::{ConfigError, TransportError},
	http::{self, ApiHttpClient, HttpResponse},
	oauth,
	obs::{self, CallKind},
};

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest transport.
pub type ReqwestSession = Session<ReqwestHttpClient>;

/// Authenticated handle to one API environment.
pub struct Session<C>
where
	C: ApiHttpClient,
{
	inner: Arc<SessionInner<C>>,
}
#[cfg(feature = "reqwest")]
impl Session<ReqwestHttpClient> {
	/// Exchanges `credentials` for a token and, when `auto_refresh` is set, arms the background
	/// refresh task.
	///
	/// Shorthand for [`Session::builder`] with default settings.
	pub async fn connect(
		credentials: Credentials,
		environment: Environment,
		auto_refresh: bool,
	) -> Result<Self> {
		Self::builder(credentials, environment).auto_refresh(auto_refresh).connect().await
	}

	/// Starts configuring a reqwest-backed session.
	pub fn builder(
		credentials: Credentials,
		environment: Environment,
	) -> SessionBuilder<ReqwestHttpClient> {
		SessionBuilder::with_http_client(credentials, environment, ReqwestHttpClient::default())
	}
}
impl<C> Session<C>
where
	C: ApiHttpClient,
{
	/// Returns the current token snapshot.
	pub fn token(&self) -> Arc<Token> {
		self.inner.token.read().clone()
	}

	/// Returns the base URL resource paths are appended to.
	pub fn api_base(&self) -> &Url {
		&self.inner.endpoints.api_base
	}

	/// Returns the endpoints resolved at construction.
	pub fn endpoints(&self) -> &ResolvedEnvironment {
		&self.inner.endpoints
	}

	/// Returns the environment this session was created for.
	pub fn environment(&self) -> &Environment {
		&self.inner.environment
	}

	/// Returns the refresh counters shared by every clone of this session.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.inner.refresh_metrics
	}

	/// Reports whether a background refresh is currently armed.
	pub fn is_refresh_scheduled(&self) -> bool {
		self.inner.refresh_task.lock().as_ref().is_some_and(|task| !task.is_finished())
	}

	/// Cancels the background refresh task. The current token stays usable until it expires.
	pub fn stop_refresh(&self) {
		if let Some(task) = self.inner.refresh_task.lock().take() {
			task.abort();
		}
	}

	/// Exchanges the credentials again and swaps the new token in.
	///
	/// Serialized with the background task, so at most one refresh per session is in flight.
	/// The background schedule is left untouched.
	pub async fn refresh(&self) -> Result<Arc<Token>> {
		self.inner.refresh_token(CallKind::TokenRefresh).await.map(|(token, _)| token)
	}

	/// Sends one bearer-authenticated request to `{api_base}/{segments..}`.
	///
	/// `body`, when present, is sent as JSON. The response is returned whatever its status;
	/// pass it to [`crate::response::classify`] to map it onto a typed result.
	pub async fn send(
		&self,
		method: Method,
		segments: &[&str],
		body: Option<Vec<u8>>,
	) -> Result<HttpResponse> {
		let url = self.inner.endpoints.resource_url(segments)?;
		let token = self.token();
		let mut builder = Request::builder()
			.method(method)
			.uri(url.as_str())
			.header(AUTHORIZATION, token.bearer())
			.header(ACCEPT, HeaderValue::from_static("application/json"));

		if body.is_some() {
			builder = builder.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		let request = builder.body(body.unwrap_or_default()).map_err(ConfigError::from)?;
		let http_client = &self.inner.http_client;

		with_deadline(self.inner.request_timeout, async move {
			http_client.execute(request).await.map_err(http::map_transport_error::<C>)
		})
		.await
	}
}
impl<C> Clone for Session<C>
where
	C: ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone() }
	}
}
impl<C> Debug for Session<C>
where
	C: ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("environment", &self.inner.environment)
			.field("api_base", &self.inner.endpoints.api_base.as_str())
			.field("token", &self.token())
			.field("refresh_scheduled", &self.is_refresh_scheduled())
			.finish()
	}
}

/// Configures and connects a [`Session`].
pub struct SessionBuilder<C>
where
	C: ApiHttpClient,
{
	credentials: Credentials,
	environment: Environment,
	http_client: Arc<C>,
	resolver: Arc<dyn EnvironmentResolver>,
	request_timeout: Option<Duration>,
	refresh_policy: RefreshPolicy,
	auto_refresh: bool,
}
impl<C> SessionBuilder<C>
where
	C: ApiHttpClient,
{
	/// Creates a builder that reuses the caller-provided transport.
	pub fn with_http_client(
		credentials: Credentials,
		environment: Environment,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			credentials,
			environment,
			http_client: http_client.into(),
			resolver: Arc::new(SubdomainResolver),
			request_timeout: None,
			refresh_policy: RefreshPolicy::default(),
			auto_refresh: true,
		}
	}

	/// Replaces the environment resolver (defaults to [`SubdomainResolver`]).
	pub fn resolver(mut self, resolver: impl EnvironmentResolver) -> Self {
		self.resolver = Arc::new(resolver);

		self
	}

	/// Bounds every token exchange and resource call by `timeout`.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Replaces the refresh timing policy.
	pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Enables or disables the background refresh task (enabled by default).
	pub fn auto_refresh(mut self, enabled: bool) -> Self {
		self.auto_refresh = enabled;

		self
	}

	/// Resolves the environment, performs the initial exchange, and arms the refresh task.
	///
	/// Auto-refresh needs a running Tokio runtime; without one this fails with
	/// [`ConfigError::NoRuntime`] before any request is sent.
	pub async fn connect(self) -> Result<Session<C>> {
		let endpoints = self.resolver.resolve(&self.environment)?;
		let runtime = if self.auto_refresh {
			Some(Handle::try_current().map_err(|_| ConfigError::NoRuntime)?)
		} else {
			None
		};
		let response = with_deadline(
			self.request_timeout,
			oauth::exchange(self.http_client.as_ref(), &self.credentials, &endpoints.token_endpoint),
		)
		.await?;
		let expires_in = response.expires_in;
		let token = Token::from_response(response, OffsetDateTime::now_utc());
		let lifetime = token.expires_in;
		let inner = Arc::new(SessionInner {
			http_client: self.http_client,
			credentials: self.credentials,
			environment: self.environment,
			endpoints,
			token: RwLock::new(Arc::new(token)),
			refresh_guard: AsyncMutex::new(()),
			refresh_policy: self.refresh_policy,
			refresh_metrics: RefreshMetrics::default(),
			refresh_task: Mutex::new(None),
			request_timeout: self.request_timeout,
		});

		if let Some(runtime) = runtime {
			match lifetime {
				Some(lifetime) => {
					let delay = inner.refresh_policy.refresh_delay(lifetime);

					*inner.refresh_task.lock() = Some(refresh::spawn(&runtime, &inner, delay));
				},
				None => obs::refresh_unscheduled(expires_in),
			}
		}

		Ok(Session { inner })
	}
}
impl<C> Debug for SessionBuilder<C>
where
	C: ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionBuilder")
			.field("credentials", &self.credentials)
			.field("environment", &self.environment)
			.field("request_timeout", &self.request_timeout)
			.field("refresh_policy", &self.refresh_policy)
			.field("auto_refresh", &self.auto_refresh)
			.finish()
	}
}

pub(crate) struct SessionInner<C>
where
	C: ApiHttpClient,
{
	http_client: Arc<C>,
	credentials: Credentials,
	environment: Environment,
	endpoints: ResolvedEnvironment,
	token: RwLock<Arc<Token>>,
	refresh_guard: AsyncMutex<()>,
	refresh_policy: RefreshPolicy,
	refresh_metrics: RefreshMetrics,
	refresh_task: Mutex<Option<JoinHandle<()>>>,
	request_timeout: Option<Duration>,
}
impl<C> SessionInner<C>
where
	C: ApiHttpClient,
{
	/// Re-exchanges the credentials and swaps the token; returns the raw `expires_in` too.
	async fn refresh_token(&self, kind: CallKind) -> Result<(Arc<Token>, i64)> {
		let _singleflight = self.refresh_guard.lock().await;

		self.refresh_metrics.record_attempt();

		let response = with_deadline(
			self.request_timeout,
			oauth::exchange_as(
				kind,
				self.http_client.as_ref(),
				&self.credentials,
				&self.endpoints.token_endpoint,
			),
		)
		.await
		.inspect_err(|_| self.refresh_metrics.record_failure())?;
		let expires_in = response.expires_in;
		let token = Arc::new(Token::from_response(response, OffsetDateTime::now_utc()));

		*self.token.write() = token.clone();

		self.refresh_metrics.record_success();

		Ok((token, expires_in))
	}
}
impl<C> Drop for SessionInner<C>
where
	C: ApiHttpClient,
{
	fn drop(&mut self) {
		if let Some(task) = self.refresh_task.get_mut().take() {
			task.abort();
		}
	}
}

/// Runs `fut` under the optional per-request deadline.
async fn with_deadline<F, T>(timeout: Option<Duration>, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	match timeout {
		Some(timeout) => tokio::time::timeout(timeout, fut)
			.await
			.map_err(|_| Error::from(TransportError::Timeout { timeout: Some(timeout) }))?,
		None => fut.await,
	}
}
