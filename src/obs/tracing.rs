// self
use crate::{_prelude::*, obs::RenewKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRun<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRun<F> = F;

/// A span builder used by renewal runs.
#[derive(Clone, Debug)]
pub struct RenewSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RenewSpan {
	/// Creates a new span tagged with the provided credential kind.
	pub fn new(kind: RenewKind) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("lease_renewer.renew", kind = kind.as_str());

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = kind;

			Self {}
		}
	}

	/// Instruments the renewal loop without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRun<Fut>
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

/// Logs how a renewal run ended.
pub fn trace_termination(kind: RenewKind, outcome: &Result<()>) {
	#[cfg(feature = "tracing")]
	{
		match outcome {
			Ok(()) => {
				tracing::debug!(kind = kind.as_str(), "renewal finished; secret should be re-read")
			},
			Err(e) => {
				tracing::warn!(kind = kind.as_str(), error = %e, "renewal ended with an error")
			},
		}
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, outcome);
	}
}

/// Logs a renewal that succeeded and scheduled the next attempt.
pub fn trace_renewed(kind: RenewKind, lease: Duration, wait: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(kind = kind.as_str(), %lease, %wait, "renewed; next attempt scheduled");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, lease, wait);
	}
}
