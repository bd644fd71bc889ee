#![allow(dead_code)]

// std
use std::{
	io,
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use httpmock::prelude::*;
// self
use enode_client::{
	auth::Credentials,
	environment::Environment,
	http::{ApiHttpClient, HttpClientError, HttpRequest, HttpResponse, TransportFuture},
	oauth::oauth2::http::{StatusCode, header::CONTENT_TYPE},
	url::Url,
};
#[cfg(feature = "reqwest")] use enode_client::session::{ReqwestSession, Session};

pub const CLIENT_ID: &str = "client-enode";
pub const CLIENT_SECRET: &str = "secret-enode";
pub const ACCESS_TOKEN: &str = "token-abc";

pub fn credentials() -> Credentials {
	Credentials::new(CLIENT_ID, CLIENT_SECRET)
}

pub fn environment(server: &MockServer) -> Environment {
	Environment::Custom(Url::parse(&server.base_url()).expect("Mock server URL should parse."))
}

pub fn token_body(access_token: &str, expires_in: &str) -> String {
	format!(
		r#"{{"access_token":"{access_token}","token_type":"bearer","scope":"all","expires_in":{expires_in}}}"#
	)
}

/// Registers a token endpoint answering with [`ACCESS_TOKEN`].
pub async fn mock_token_endpoint(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body(ACCESS_TOKEN, "3600"));
		})
		.await
}

/// Connects a session without background refresh against the mock server.
#[cfg(feature = "reqwest")]
pub async fn connect(server: &MockServer) -> ReqwestSession {
	mock_token_endpoint(server).await;

	Session::builder(credentials(), environment(server))
		.auto_refresh(false)
		.connect()
		.await
		.expect("Session should connect against the mock token endpoint.")
}

pub fn response(status: u16, body: impl Into<Vec<u8>>) -> HttpResponse {
	let mut response = HttpResponse::new(body.into());

	*response.status_mut() = StatusCode::from_u16(status).expect("Fixture status should be valid.");

	response.headers_mut().insert(
		CONTENT_TYPE,
		"application/json".parse().expect("Content type fixture should be a valid header."),
	);

	response
}

/// Token response whose access token and scope both carry `n`.
pub fn numbered_token(n: usize, expires_in: &str) -> HttpResponse {
	response(
		200,
		format!(
			r#"{{"access_token":"token-{n}","token_type":"bearer","scope":"scope-{n}","expires_in":{expires_in}}}"#
		),
	)
}

type Responder = dyn Fn(usize, &HttpRequest) -> Result<HttpResponse, io::Error> + Send + Sync;

/// In-process transport answering from a closure; `n` is the zero-based call index.
pub struct ScriptedClient {
	responder: Box<Responder>,
	latency: Option<Duration>,
	calls: AtomicUsize,
	requests: Mutex<Vec<HttpRequest>>,
}
impl ScriptedClient {
	pub fn new(
		responder: impl 'static + Send + Sync + Fn(usize, &HttpRequest) -> Result<HttpResponse, io::Error>,
	) -> Arc<Self> {
		Arc::new(Self {
			responder: Box::new(responder),
			latency: None,
			calls: AtomicUsize::new(0),
			requests: Mutex::new(Vec::new()),
		})
	}

	pub fn with_latency(
		latency: Duration,
		responder: impl 'static + Send + Sync + Fn(usize, &HttpRequest) -> Result<HttpResponse, io::Error>,
	) -> Arc<Self> {
		Arc::new(Self {
			responder: Box::new(responder),
			latency: Some(latency),
			calls: AtomicUsize::new(0),
			requests: Mutex::new(Vec::new()),
		})
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn request_uris(&self) -> Vec<String> {
		self.requests
			.lock()
			.expect("Request log should not be poisoned.")
			.iter()
			.map(|request| request.uri().to_string())
			.collect()
	}
}
impl ApiHttpClient for ScriptedClient {
	type TransportError = io::Error;

	fn execute(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let n = self.calls.fetch_add(1, Ordering::SeqCst);
		let result = (self.responder)(n, &request).map_err(|e| HttpClientError::Reqwest(Box::new(e)));
		let latency = self.latency;

		self.requests.lock().expect("Request log should not be poisoned.").push(request);

		Box::pin(async move {
			if let Some(latency) = latency {
				tokio::time::sleep(latency).await;
			}

			result
		})
	}
}
