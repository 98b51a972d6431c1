//! Background renewal watchdog for a single credential.
//!
//! A [`Renewer`] keeps one [`Secret`] alive by repeatedly calling its [`RenewClient`]. Each
//! run renews, publishes a best-effort [`RenewTick`], and sleeps for half of the freshly
//! reported lifetime, until one of these happens:
//!
//! - the renewal call fails (the collaborator error becomes the outcome);
//! - the service stops allowing renewal ([`Error::NotRenewable`]);
//! - the response carries no usable payload ([`Error::NoSecretData`]);
//! - the remaining lifetime drops to the configured grace or below (`Ok(())`);
//! - [`Renewer::stop`] fires (`Ok(())`).
//!
//! The outcome is published exactly once through [`Renewer::done`]. Any outcome means the
//! caller should obtain a fresh credential; `Ok(())` just means it ended on schedule.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use lease_renewer::{ReqwestRenewClient, Renewer, RenewerConfig, Secret};
//! # async fn demo(client: ReqwestRenewClient, secret: Secret) -> lease_renewer::Result<()> {
//! let renewer = Arc::new(Renewer::<ReqwestRenewClient>::new(client, RenewerConfig::new(secret))?);
//! let _task = renewer.spawn();
//!
//! loop {
//! 	tokio::select! {
//! 		outcome = renewer.done() => {
//! 			// Renewal is over either way; re-read the secret.
//! 			outcome.unwrap_or(Ok(()))?;
//!
//! 			break;
//! 		},
//! 		Some(tick) = renewer.next_tick() => println!("renewed #{}", tick.sequence),
//! 	}
//! }
//! # Ok(())
//! # }
//! ```

mod metrics;
mod target;

pub use metrics::RenewalMetrics;

// crates.io
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	client::RenewClient,
	error::ConfigError,
	obs::{self, RenewOutcome, RenewSpan},
	secret::Secret,
};
use target::RenewTarget;

/// Grace applied when the configuration leaves it at zero.
pub const DEFAULT_RENEWER_GRACE: Duration = Duration::seconds(15);
/// Shortest wait between two renewal calls, unless the reported lifetime is shorter still.
pub const MIN_RENEW_INTERVAL: Duration = Duration::seconds(1);
/// Number of undelivered ticks buffered before new ones are dropped.
pub const TICK_CHANNEL_CAPACITY: usize = 5;

/// Input used to construct a [`Renewer`].
#[derive(Clone, Debug, Default)]
pub struct RenewerConfig {
	/// Secret to keep alive.
	pub secret: Option<Arc<Secret>>,
	/// Minimum remaining lifetime worth renewing for; zero selects [`DEFAULT_RENEWER_GRACE`].
	///
	/// Once a renewal reports this much time or less, the run ends so the caller can re-read
	/// the secret before it expires.
	pub grace: Duration,
}
impl RenewerConfig {
	/// Creates a configuration for the provided secret with the default grace.
	pub fn new(secret: impl Into<Arc<Secret>>) -> Self {
		Self { secret: Some(secret.into()), grace: Duration::ZERO }
	}

	/// Overrides the grace period.
	pub fn with_grace(mut self, grace: Duration) -> Self {
		self.grace = grace;

		self
	}
}

/// Notification published after every successful renewal call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenewTick {
	/// 1-based count of successful renewals in this run.
	pub sequence: u64,
	/// Instant the renewal call returned.
	pub renewed_at: OffsetDateTime,
}

struct Senders {
	ticks: mpsc::Sender<RenewTick>,
	done: mpsc::Sender<Result<()>>,
}

/// Renews one secret in the background until renewal is impossible, pointless, or stopped.
pub struct Renewer<C>
where
	C: ?Sized + RenewClient,
{
	client: Arc<C>,
	secret: Arc<Secret>,
	grace: Duration,
	stopped: Mutex<bool>,
	cancel: CancellationToken,
	senders: Mutex<Option<Senders>>,
	ticks: AsyncMutex<mpsc::Receiver<RenewTick>>,
	done: AsyncMutex<mpsc::Receiver<Result<()>>>,
	metrics: Arc<RenewalMetrics>,
}
impl<C> Renewer<C>
where
	C: ?Sized + RenewClient,
{
	/// Validates the configuration and allocates the tick and outcome channels.
	///
	/// No I/O happens here; nothing is renewed until [`Renewer::renew`] runs.
	pub fn new(
		client: impl Into<Arc<C>>,
		config: impl Into<Option<RenewerConfig>>,
	) -> Result<Self> {
		let config = config.into().ok_or(ConfigError::MissingInput)?;
		let secret = config.secret.ok_or(ConfigError::MissingSecret)?;
		let grace = match config.grace {
			grace if grace.is_negative() => return Err(ConfigError::NegativeGrace { grace }.into()),
			grace if grace.is_zero() => DEFAULT_RENEWER_GRACE,
			grace => grace,
		};
		let (tick_tx, tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
		let (done_tx, done_rx) = mpsc::channel(1);

		Ok(Self {
			client: client.into(),
			secret,
			grace,
			stopped: Mutex::new(false),
			cancel: CancellationToken::new(),
			senders: Mutex::new(Some(Senders { ticks: tick_tx, done: done_tx })),
			ticks: AsyncMutex::new(tick_rx),
			done: AsyncMutex::new(done_rx),
			metrics: Default::default(),
		})
	}

	/// Collaborator used for renewal calls.
	pub fn client(&self) -> &Arc<C> {
		&self.client
	}

	/// Secret being renewed.
	pub fn secret(&self) -> &Secret {
		&self.secret
	}

	/// Effective grace period after defaults were applied.
	pub fn grace(&self) -> Duration {
		self.grace
	}

	/// Call counters for this renewer.
	pub fn metrics(&self) -> &Arc<RenewalMetrics> {
		&self.metrics
	}

	/// Requests cancellation. Safe to call any number of times from any context.
	///
	/// The run notices at its next iteration boundary or while sleeping; an in-flight renewal
	/// call is not interrupted.
	pub fn stop(&self) {
		let mut stopped = self.stopped.lock();

		if !*stopped {
			*stopped = true;

			self.cancel.cancel();
		}
	}

	/// Returns `true` once [`Renewer::stop`] has been called.
	pub fn is_stopped(&self) -> bool {
		*self.stopped.lock()
	}

	/// Waits for the next tick.
	///
	/// Returns `None` once the run has ended and every buffered tick was consumed.
	pub async fn next_tick(&self) -> Option<RenewTick> {
		self.ticks.lock().await.recv().await
	}

	/// Returns a buffered tick without waiting.
	pub fn try_next_tick(&self) -> Option<RenewTick> {
		self.ticks.try_lock()?.try_recv().ok()
	}

	/// Waits for the terminal outcome.
	///
	/// Yields `Some` exactly once per renewer; later calls return `None`. Never resolves if
	/// the renewer is never started.
	pub async fn done(&self) -> Option<Result<()>> {
		self.done.lock().await.recv().await
	}

	/// Returns the terminal outcome if it has already been published.
	pub fn try_done(&self) -> Option<Result<()>> {
		self.done.try_lock()?.try_recv().ok()
	}

	/// Runs [`Renewer::renew`] on the current tokio runtime.
	pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
		let renewer = Arc::clone(self);

		tokio::spawn(async move { renewer.renew().await })
	}

	/// Runs the renewal loop to completion and publishes its outcome.
	///
	/// A renewer runs once; calling this again after the first run started does nothing.
	pub async fn renew(&self) {
		let Some(Senders { ticks, done }) = self.senders.lock().take() else {
			return;
		};
		let target = RenewTarget::from_secret(&self.secret);
		let kind = target.kind();
		let outcome = RenewSpan::new(kind).instrument(self.run(&target, &ticks)).await;

		obs::trace_termination(kind, &outcome);
		// Close the tick channel before the outcome lands so no tick can follow it.
		drop(ticks);

		let _ = done.send(outcome).await;
	}

	async fn run(&self, target: &RenewTarget, ticks: &mpsc::Sender<RenewTick>) -> Result<()> {
		let kind = target.kind();

		target.ensure_renewable()?;

		let mut sequence = 0;

		loop {
			if self.cancel.is_cancelled() {
				return Ok(());
			}

			self.metrics.record_attempt();
			obs::record_renewal(kind, RenewOutcome::Attempt);

			let renewal = match target.renew(self.client.as_ref()).await {
				Ok(renewal) => renewal,
				Err(e) => {
					self.metrics.record_failure();
					obs::record_renewal(kind, RenewOutcome::Failure);

					return Err(Error::remote(e));
				},
			};

			self.metrics.record_success();
			obs::record_renewal(kind, RenewOutcome::Success);

			sequence += 1;

			let tick = RenewTick { sequence, renewed_at: OffsetDateTime::now_utc() };

			if ticks.try_send(tick).is_err() {
				self.metrics.record_dropped_tick();
			}

			let lease = renewal
				.as_ref()
				.and_then(|renewal| target.lease_of(renewal))
				.ok_or(Error::NoSecretData)?;

			if !lease.renewable {
				return Err(Error::NotRenewable);
			}
			if lease.ttl <= self.grace {
				return Ok(());
			}

			let wait = next_interval(lease.ttl);

			obs::trace_renewed(kind, lease.ttl, wait);

			tokio::select! {
				_ = self.cancel.cancelled() => return Ok(()),
				_ = tokio::time::sleep(wait.unsigned_abs()) => {},
			}
		}
	}
}
impl<C> Debug for Renewer<C>
where
	C: ?Sized + RenewClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Renewer")
			.field("secret", &self.secret)
			.field("grace", &self.grace)
			.field("stopped", &self.is_stopped())
			.finish()
	}
}

/// Half of the reported lifetime, floored at [`MIN_RENEW_INTERVAL`] but never past the lifetime.
fn next_interval(ttl: Duration) -> Duration {
	(ttl / 2_i32).max(MIN_RENEW_INTERVAL.min(ttl))
}

#[cfg(test)]
mod tests {
	// std
	use std::{convert::Infallible, thread};
	// self
	use super::*;
	use crate::{client::RenewFuture, secret::TokenSecret};

	struct EchoClient;
	impl RenewClient for EchoClient {
		type Error = Infallible;

		fn renew_token_as_self<'a>(
			&'a self,
			token: &'a TokenSecret,
			_: Duration,
		) -> RenewFuture<'a, Self::Error> {
			Box::pin(async move {
				Ok(Some(Secret::for_token(token.clone(), Duration::hours(1), true)))
			})
		}

		fn renew_lease<'a>(
			&'a self,
			lease_id: &'a str,
			_: Duration,
		) -> RenewFuture<'a, Self::Error> {
			Box::pin(async move { Ok(Some(Secret::for_lease(lease_id, Duration::hours(1), true))) })
		}
	}

	fn lease() -> Secret {
		Secret::for_lease("database/creds/app/1", Duration::hours(1), true)
	}

	fn build(config: impl Into<Option<RenewerConfig>>) -> Result<Renewer<EchoClient>> {
		Renewer::new(EchoClient, config)
	}

	#[test]
	fn construction_rejects_missing_input_and_secret() {
		let err = build(None).expect_err("Construction without input must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingInput)));

		let err = build(RenewerConfig::default())
			.expect_err("Construction without a secret must fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingSecret)));
	}

	#[test]
	fn construction_validates_and_defaults_grace() {
		let renewer = build(RenewerConfig::new(lease()))
			.expect("Zero grace should fall back to the default.");

		assert_eq!(renewer.grace(), DEFAULT_RENEWER_GRACE);

		let renewer = build(RenewerConfig::new(lease()).with_grace(Duration::seconds(42)))
			.expect("Positive grace should be kept.");

		assert_eq!(renewer.grace(), Duration::seconds(42));

		let err = build(RenewerConfig::new(lease()).with_grace(Duration::seconds(-1)))
			.expect_err("Negative grace must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::NegativeGrace { .. })));
	}

	#[test]
	fn stop_is_idempotent_across_threads() {
		let renewer =
			Arc::new(build(RenewerConfig::new(lease())).expect("Renewer fixture should build."));

		assert!(!renewer.is_stopped());

		let handles = (0..8)
			.map(|_| {
				let renewer = renewer.clone();

				thread::spawn(move || {
					for _ in 0..16 {
						renewer.stop();
					}
				})
			})
			.collect::<Vec<_>>();

		for handle in handles {
			handle.join().expect("Stopping thread should not panic.");
		}

		assert!(renewer.is_stopped());
		assert!(renewer.cancel.is_cancelled());
	}

	#[test]
	fn next_interval_halves_and_floors() {
		assert_eq!(next_interval(Duration::seconds(100)), Duration::seconds(50));
		assert_eq!(next_interval(Duration::seconds(3)), Duration::milliseconds(1_500));
		assert_eq!(next_interval(Duration::seconds(1)), MIN_RENEW_INTERVAL);
	}

	#[test]
	fn next_interval_floor_stays_within_short_lifetimes() {
		assert_eq!(next_interval(Duration::milliseconds(800)), Duration::milliseconds(800));
		assert_eq!(next_interval(Duration::milliseconds(1_600)), MIN_RENEW_INTERVAL);
	}

	#[test]
	fn nothing_is_published_before_the_run() {
		let renewer = build(RenewerConfig::new(lease())).expect("Renewer fixture should build.");

		assert!(renewer.try_next_tick().is_none());
		assert!(renewer.try_done().is_none());
	}

	#[tokio::test]
	async fn stopped_before_start_finishes_cleanly_without_calls() {
		let renewer = build(RenewerConfig::new(lease())).expect("Renewer fixture should build.");

		renewer.stop();
		renewer.renew().await;

		assert!(matches!(renewer.done().await, Some(Ok(()))));
		assert!(renewer.done().await.is_none());
		assert!(renewer.next_tick().await.is_none());
		assert_eq!(renewer.metrics().attempts(), 0);
	}

	#[tokio::test]
	async fn second_run_is_a_noop() {
		let renewer = build(RenewerConfig::new(lease())).expect("Renewer fixture should build.");

		renewer.stop();
		renewer.renew().await;
		renewer.renew().await;

		assert!(matches!(renewer.try_done(), Some(Ok(()))));
		assert!(renewer.try_done().is_none());
	}
}
