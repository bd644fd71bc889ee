mod common;

// std
use std::{io, sync::Arc, time::Duration};
// self
use common::*;
use enode_client::{
	environment::Environment,
	error::{Error, ErrorKind, TransportError},
	session::{RefreshPolicy, SessionBuilder},
	url::Url,
};

fn environment() -> Environment {
	Environment::Custom(Url::parse("http://enode.test").expect("Fixture URL should parse."))
}

fn builder(client: &Arc<ScriptedClient>) -> SessionBuilder<ScriptedClient> {
	SessionBuilder::with_http_client(credentials(), environment(), client.clone())
		.refresh_policy(RefreshPolicy::default().with_jitter(0.0))
}

async fn advance(secs: u64) {
	tokio::time::sleep(Duration::from_secs(secs)).await;
}

#[tokio::test(start_paused = true)]
async fn refresh_fires_margin_before_string_expiry() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "\"3600\"")));
	let session = builder(&client).connect().await.expect("Session should connect.");

	assert_eq!(client.calls(), 1);
	assert!(session.is_refresh_scheduled());
	assert_eq!(session.token().access_token.expose(), "token-0");

	advance(3569).await;

	assert_eq!(client.calls(), 1);

	advance(2).await;

	assert_eq!(client.calls(), 2);
	assert_eq!(session.token().access_token.expose(), "token-1");
	assert_eq!(client.request_uris(), ["http://enode.test/oauth2/token"; 2]);

	advance(3570).await;

	assert_eq!(client.calls(), 3);
	assert_eq!(session.refresh_metrics().successes(), 2);
}

#[tokio::test(start_paused = true)]
async fn short_lifetime_refreshes_immediately() {
	let client = ScriptedClient::new(|n, _| {
		Ok(numbered_token(n, if n == 0 { "10" } else { "3600" }))
	});
	let session = builder(&client).connect().await.expect("Session should connect.");

	tokio::task::yield_now().await;
	advance(1).await;

	assert_eq!(client.calls(), 2);
	assert_eq!(session.token().access_token.expose(), "token-1");
}

#[tokio::test(start_paused = true)]
async fn huge_lifetime_connects_without_an_expiry_instant() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "1e15")));
	let session = builder(&client).connect().await.expect("Session should connect.");
	let token = session.token();

	assert_eq!(token.expires_in, Some(Duration::from_secs(1_000_000_000_000_000)));
	assert_eq!(token.expires_at(), None);
	assert!(!token.is_expired_at(time::OffsetDateTime::now_utc()));
	assert!(session.is_refresh_scheduled());

	advance(86_400).await;

	assert_eq!(client.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_refresh_backs_off_then_recovers() {
	let client = ScriptedClient::new(|n, _| match n {
		0 => Ok(numbered_token(n, "60")),
		1 | 2 => Ok(response(503, "maintenance")),
		_ => Ok(numbered_token(n, "3600")),
	});
	let session = builder(&client).connect().await.expect("Session should connect.");

	advance(31).await;

	assert_eq!(client.calls(), 2);
	assert_eq!(session.refresh_metrics().failures(), 1);
	assert_eq!(session.token().access_token.expose(), "token-0");
	assert!(session.is_refresh_scheduled());

	// Retries at t=35 (5s) and t=45 (10s).
	advance(5).await;

	assert_eq!(client.calls(), 3);

	advance(10).await;

	assert_eq!(client.calls(), 4);
	assert_eq!(session.token().access_token.expose(), "token-3");

	let metrics = session.refresh_metrics();

	assert_eq!((metrics.attempts(), metrics.successes(), metrics.failures()), (3, 1, 2));

	advance(3568).await;

	assert_eq!(client.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn transport_failures_are_retried_without_panicking() {
	let client = ScriptedClient::new(|n, _| match n {
		0 => Ok(numbered_token(n, "30")),
		1 => Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")),
		_ => Ok(numbered_token(n, "3600")),
	});
	let session = builder(&client).connect().await.expect("Session should connect.");

	advance(1).await;

	assert_eq!(client.calls(), 2);
	assert_eq!(session.refresh_metrics().failures(), 1);

	advance(5).await;

	assert_eq!(client.calls(), 3);
	assert_eq!(session.token().access_token.expose(), "token-2");
}

#[tokio::test(start_paused = true)]
async fn unusable_lifetime_leaves_refresh_unscheduled() {
	for expires_in in ["0", "-30", "\"soon\"", "null"] {
		let client = ScriptedClient::new(move |n, _| Ok(numbered_token(n, expires_in)));
		let session = builder(&client).connect().await.expect("Session should connect.");

		assert!(!session.is_refresh_scheduled());

		advance(86_400).await;

		assert_eq!(client.calls(), 1);
	}
}

#[tokio::test(start_paused = true)]
async fn refresh_without_usable_lifetime_stops_rescheduling() {
	let client = ScriptedClient::new(|n, _| {
		Ok(numbered_token(n, if n == 0 { "60" } else { "\"never\"" }))
	});
	let session = builder(&client).connect().await.expect("Session should connect.");

	advance(31).await;

	assert_eq!(client.calls(), 2);
	assert!(!session.is_refresh_scheduled());

	advance(86_400).await;

	assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_refresh_cancels_the_timer() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "3600")));
	let session = builder(&client).connect().await.expect("Session should connect.");

	session.stop_refresh();

	assert!(!session.is_refresh_scheduled());

	advance(7200).await;

	assert_eq!(client.calls(), 1);
	assert_eq!(session.token().access_token.expose(), "token-0");
}

#[tokio::test(start_paused = true)]
async fn dropping_the_last_clone_ends_the_task() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "120")));
	let session = builder(&client).connect().await.expect("Session should connect.");
	let clone = session.clone();

	drop(session);
	advance(91).await;

	assert_eq!(client.calls(), 2);

	drop(clone);
	advance(7200).await;

	assert_eq!(client.calls(), 2);
	assert_eq!(Arc::strong_count(&client), 1);
}

#[tokio::test(start_paused = true)]
async fn disabled_auto_refresh_never_spawns() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "60")));
	let session =
		builder(&client).auto_refresh(false).connect().await.expect("Session should connect.");

	assert!(!session.is_refresh_scheduled());

	advance(600).await;

	assert_eq!(client.calls(), 1);

	let token = session.refresh().await.expect("Manual refresh should succeed.");

	assert_eq!(token.access_token.expose(), "token-1");
	assert_eq!(session.token(), token);
	assert_eq!(session.refresh_metrics().attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn request_timeout_bounds_the_exchange() {
	let client = ScriptedClient::with_latency(Duration::from_secs(60), |n, _| {
		Ok(numbered_token(n, "3600"))
	});
	let err = builder(&client)
		.request_timeout(Duration::from_secs(5))
		.connect()
		.await
		.expect_err("Slow token endpoint should time out.");

	assert_eq!(err.kind(), ErrorKind::Transport);
	assert!(matches!(
		err,
		Error::Transport(TransportError::Timeout { timeout: Some(timeout) })
			if timeout == Duration::from_secs(5)
	));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reads_never_observe_torn_tokens() {
	let client = ScriptedClient::new(|n, _| Ok(numbered_token(n, "3600")));
	let session = Arc::new(
		builder(&client).auto_refresh(false).connect().await.expect("Session should connect."),
	);
	let readers = (0..4)
		.map(|_| {
			let session = session.clone();

			tokio::spawn(async move {
				for _ in 0..2_000 {
					let token = session.token();
					let access = token.access_token.expose().trim_start_matches("token-");
					let scope = token.scope.trim_start_matches("scope-");

					assert_eq!(access, scope);

					tokio::task::yield_now().await;
				}
			})
		})
		.collect::<Vec<_>>();
	let writers = (0..2)
		.map(|_| {
			let session = session.clone();

			tokio::spawn(async move {
				for _ in 0..100 {
					session.refresh().await.expect("Manual refresh should succeed.");
				}
			})
		})
		.collect::<Vec<_>>();

	for handle in readers.into_iter().chain(writers) {
		handle.await.expect("Reader and writer tasks should not panic.");
	}

	assert_eq!(session.refresh_metrics().successes(), 200);
	assert_eq!(client.calls(), 201);
}

#[tokio::test]
async fn initial_exchange_failure_is_returned() {
	let client = ScriptedClient::new(|_, _| Ok(response(401, "nope")));
	let err = builder(&client).connect().await.expect_err("401 should fail the exchange.");

	assert_eq!(err.kind(), ErrorKind::AuthExchange);
	assert_eq!(err.status(), Some(401));
}
