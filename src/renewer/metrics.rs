// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for one renewer's remote calls and tick deliveries.
#[derive(Debug, Default)]
pub struct RenewalMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	dropped_ticks: AtomicU64,
}
impl RenewalMetrics {
	/// Returns the total number of renewal calls issued.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of renewal calls that succeeded at the transport level.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of renewal calls that failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of tick notifications dropped because the channel was full.
	pub fn dropped_ticks(&self) -> u64 {
		self.dropped_ticks.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_dropped_tick(&self) {
		self.dropped_ticks.fetch_add(1, Ordering::Relaxed);
	}
}
