//! Self-rescheduling token refresh bound to a session's lifetime.
//!
//! After every successful exchange the task sleeps for `expires_in - margin` and exchanges the
//! same credentials against the same environment again. The task only holds a [`Weak`]
//! reference to the session, so dropping the last [`Session`](crate::session::Session) clone
//! (or calling [`Session::stop_refresh`](crate::session::Session::stop_refresh)) ends it.
//!
//! Failures never reach a caller. They are logged, counted in [`RefreshMetrics`], and retried
//! with exponential backoff: `min_backoff` doubled per consecutive failure, capped at
//! `max_backoff`, plus up to `jitter` of random slack. A success resets the backoff. A response
//! without a positive `expires_in` leaves the task unscheduled instead of spinning.

mod metrics;

pub use metrics::RefreshMetrics;

// crates.io
use rand::Rng;
use tokio::{runtime::Handle, task::JoinHandle};
// self
use crate::{
	_prelude::*,
	http::ApiHttpClient,
	obs::{self, CallKind},
	session::SessionInner,
};

/// Timing knobs for the background refresh task.
#[derive(Clone, Debug, PartialEq)]
pub struct RefreshPolicy {
	/// How long before expiry the token is renewed.
	pub margin: Duration,
	/// Delay before the first retry after a failed refresh.
	pub min_backoff: Duration,
	/// Upper bound for retry delays.
	pub max_backoff: Duration,
	/// Maximum random slack added to retry delays, as a fraction of the delay.
	pub jitter: f64,
}
impl RefreshPolicy {
	/// Default renewal margin.
	pub const DEFAULT_MARGIN: Duration = Duration::from_secs(30);
	/// Default first retry delay.
	pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_secs(5);
	/// Default retry delay cap.
	pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(300);
	/// Default jitter fraction.
	pub const DEFAULT_JITTER: f64 = 0.1;

	/// Overrides the renewal margin.
	pub fn with_margin(mut self, margin: Duration) -> Self {
		self.margin = margin;

		self
	}

	/// Overrides the retry bounds.
	pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
		self.min_backoff = min;
		self.max_backoff = max.max(min);

		self
	}

	/// Overrides the jitter fraction (clamped to `0.0..=1.0`).
	pub fn with_jitter(mut self, jitter: f64) -> Self {
		self.jitter = if jitter.is_nan() { 0.0 } else { jitter.clamp(0.0, 1.0) };

		self
	}

	/// Delay before renewing a token valid for `lifetime`: `max(lifetime - margin, 0)`.
	pub fn refresh_delay(&self, lifetime: Duration) -> Duration {
		lifetime.saturating_sub(self.margin)
	}

	/// Retry delay after `failures` consecutive failures, before jitter.
	pub fn backoff(&self, failures: u32) -> Duration {
		let exponent = failures.saturating_sub(1).min(31);

		self.min_backoff.saturating_mul(1 << exponent).min(self.max_backoff)
	}

	/// Retry delay after `failures` consecutive failures, with jitter applied.
	pub fn retry_delay(&self, failures: u32) -> Duration {
		let base = self.backoff(failures);

		if self.jitter.is_nan() || self.jitter <= 0.0 {
			return base;
		}

		let slack = rand::rng().random_range(0.0..=self.jitter.min(1.0));

		(base + base.mul_f64(slack)).min(self.max_backoff)
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self {
			margin: Self::DEFAULT_MARGIN,
			min_backoff: Self::DEFAULT_MIN_BACKOFF,
			max_backoff: Self::DEFAULT_MAX_BACKOFF,
			jitter: Self::DEFAULT_JITTER,
		}
	}
}

/// Spawns the refresh loop on `runtime`, first firing after `delay`.
pub(crate) fn spawn<C>(
	runtime: &Handle,
	session: &Arc<SessionInner<C>>,
	delay: Duration,
) -> JoinHandle<()>
where
	C: ApiHttpClient,
{
	let policy = session.refresh_policy.clone();

	obs::refresh_scheduled(delay);

	runtime.spawn(run(Arc::downgrade(session), policy, delay))
}

async fn run<C>(session: Weak<SessionInner<C>>, policy: RefreshPolicy, mut delay: Duration)
where
	C: ApiHttpClient,
{
	let mut failures = 0_u32;

	loop {
		tokio::time::sleep(delay).await;

		let Some(inner) = session.upgrade() else {
			return;
		};
		let outcome = inner.refresh_token(CallKind::TokenRefresh).await;

		drop(inner);

		match outcome {
			Ok((token, expires_in)) => {
				failures = 0;

				match token.expires_in {
					Some(lifetime) => {
						delay = policy.refresh_delay(lifetime);

						obs::refresh_scheduled(delay);
					},
					None => {
						obs::refresh_unscheduled(expires_in);

						return;
					},
				}
			},
			Err(e) => {
				failures = failures.saturating_add(1);
				delay = policy.retry_delay(failures);

				obs::refresh_failed(e.kind(), &e, delay);
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_delay_subtracts_margin_and_saturates() {
		let policy = RefreshPolicy::default();

		assert_eq!(policy.refresh_delay(Duration::from_secs(3600)), Duration::from_secs(3570));
		assert_eq!(policy.refresh_delay(Duration::from_secs(30)), Duration::ZERO);
		assert_eq!(policy.refresh_delay(Duration::from_secs(10)), Duration::ZERO);
	}

	#[test]
	fn backoff_doubles_until_capped() {
		let policy = RefreshPolicy::default();
		let delays = (1..=8).map(|n| policy.backoff(n).as_secs()).collect::<Vec<_>>();

		assert_eq!(delays, [5, 10, 20, 40, 80, 160, 300, 300]);
		assert_eq!(policy.backoff(u32::MAX), Duration::from_secs(300));
	}

	#[test]
	fn jitter_stays_within_bounds() {
		let policy = RefreshPolicy::default();

		for failures in 1..=10 {
			let base = policy.backoff(failures);
			let delay = policy.retry_delay(failures);

			assert!(delay >= base);
			assert!(delay <= base.mul_f64(1.1).min(policy.max_backoff));
		}

		let exact = policy.clone().with_jitter(0.0);

		assert_eq!(exact.retry_delay(3), Duration::from_secs(20));
	}
}
