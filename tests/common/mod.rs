//! Scripted [`RenewClient`] shared by the renewer integration tests.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	sync::atomic::{AtomicUsize, Ordering},
};
// crates.io
use parking_lot::Mutex;
use thiserror::Error as ThisError;
use time::Duration;
// self
use lease_renewer::{RenewClient, RenewFuture, RenewTick, Renewer, Secret, TokenSecret};

/// Failure returned by a scripted step.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("scripted renewal failure: {0}")]
pub struct ScriptedError(pub &'static str);

/// One scripted response, optionally delayed to simulate a slow call.
pub struct Step {
	pub delay: Duration,
	pub response: Result<Option<Secret>, ScriptedError>,
}
impl Step {
	pub fn renewed(secret: Secret) -> Self {
		Self { delay: Duration::ZERO, response: Ok(Some(secret)) }
	}

	pub fn empty() -> Self {
		Self { delay: Duration::ZERO, response: Ok(None) }
	}

	pub fn fail(reason: &'static str) -> Self {
		Self { delay: Duration::ZERO, response: Err(ScriptedError(reason)) }
	}

	pub fn delayed(mut self, delay: Duration) -> Self {
		self.delay = delay;

		self
	}
}

/// Replays scripted steps in order, then repeats `fallback` forever (or fails without one).
#[derive(Default)]
pub struct ScriptedClient {
	script: Mutex<VecDeque<Step>>,
	fallback: Option<Secret>,
	token_calls: AtomicUsize,
	lease_calls: AtomicUsize,
	increments: Mutex<Vec<Duration>>,
	tokens: Mutex<Vec<String>>,
	lease_ids: Mutex<Vec<String>>,
}
impl ScriptedClient {
	pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
		Self { script: Mutex::new(steps.into_iter().collect()), ..Default::default() }
	}

	pub fn with_fallback(mut self, secret: Secret) -> Self {
		self.fallback = Some(secret);

		self
	}

	pub fn token_calls(&self) -> usize {
		self.token_calls.load(Ordering::SeqCst)
	}

	pub fn lease_calls(&self) -> usize {
		self.lease_calls.load(Ordering::SeqCst)
	}

	pub fn calls(&self) -> usize {
		self.token_calls() + self.lease_calls()
	}

	pub fn increments(&self) -> Vec<Duration> {
		self.increments.lock().clone()
	}

	pub fn tokens(&self) -> Vec<String> {
		self.tokens.lock().clone()
	}

	pub fn lease_ids(&self) -> Vec<String> {
		self.lease_ids.lock().clone()
	}

	fn next_step(&self, increment: Duration) -> Step {
		self.increments.lock().push(increment);

		let scripted = self.script.lock().pop_front();

		match scripted {
			Some(step) => step,
			None => match &self.fallback {
				Some(secret) => Step::renewed(secret.clone()),
				None => Step::fail("script exhausted"),
			},
		}
	}

	fn replay(&self, step: Step) -> RenewFuture<'_, ScriptedError> {
		Box::pin(async move {
			if step.delay.is_positive() {
				tokio::time::sleep(step.delay.unsigned_abs()).await;
			}

			step.response
		})
	}
}
impl RenewClient for ScriptedClient {
	type Error = ScriptedError;

	fn renew_token_as_self<'a>(
		&'a self,
		token: &'a TokenSecret,
		increment: Duration,
	) -> RenewFuture<'a, Self::Error> {
		self.token_calls.fetch_add(1, Ordering::SeqCst);
		self.tokens.lock().push(token.expose().to_owned());

		let step = self.next_step(increment);

		self.replay(step)
	}

	fn renew_lease<'a>(
		&'a self,
		lease_id: &'a str,
		increment: Duration,
	) -> RenewFuture<'a, Self::Error> {
		self.lease_calls.fetch_add(1, Ordering::SeqCst);
		self.lease_ids.lock().push(lease_id.to_owned());

		let step = self.next_step(increment);

		self.replay(step)
	}
}

pub fn lease(lease_id: &str, secs: i64, renewable: bool) -> Secret {
	Secret::for_lease(lease_id, Duration::seconds(secs), renewable)
}

pub fn token(token: &str, secs: i64, renewable: bool) -> Secret {
	Secret::for_token(token, Duration::seconds(secs), renewable)
}

/// Drains every tick currently buffered without waiting.
pub fn drain_ticks<C>(renewer: &Renewer<C>) -> Vec<RenewTick>
where
	C: ?Sized + RenewClient,
{
	std::iter::from_fn(|| renewer.try_next_tick()).collect()
}
