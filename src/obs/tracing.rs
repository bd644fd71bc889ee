// self
use crate::{_prelude::*, error::ErrorKind, obs::CallKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used around outbound calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided call kind + stage.
	pub fn new(kind: CallKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("enode_client.call", call = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn refresh_scheduled(delay: Duration) {
	#[cfg(feature = "tracing")]
	tracing::debug!(delay_secs = delay.as_secs(), "token refresh scheduled");
	#[cfg(not(feature = "tracing"))]
	let _ = delay;
}

pub(crate) fn refresh_unscheduled(expires_in: i64) {
	#[cfg(feature = "tracing")]
	tracing::warn!(expires_in, "token response carried no usable lifetime; refresh not scheduled");
	#[cfg(not(feature = "tracing"))]
	let _ = expires_in;
}

pub(crate) fn refresh_failed(kind: ErrorKind, error: &Error, retry_in: Duration) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		kind = kind.as_str(),
		error = %error,
		retry_in_secs = retry_in.as_secs(),
		"token refresh failed"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, error, retry_in);
}
