//! Optional observability helpers for renewal runs.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap every run in a `lease_renewer.renew` span with a `kind` (auth or
//!   lease) field, and to log how each run ended.
//! - Enable `metrics` to increment the `lease_renewer_renewal_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Credential kinds a renewer can keep alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenewKind {
	/// Auth token renewed as itself.
	Auth,
	/// Leased secret renewed by lease identifier.
	Lease,
}
impl RenewKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RenewKind::Auth => "auth",
			RenewKind::Lease => "lease",
		}
	}
}
impl Display for RenewKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each renewal call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenewOutcome {
	/// A renewal call is about to be issued.
	Attempt,
	/// The renewal call succeeded.
	Success,
	/// The renewal call failed.
	Failure,
}
impl RenewOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RenewOutcome::Attempt => "attempt",
			RenewOutcome::Success => "success",
			RenewOutcome::Failure => "failure",
		}
	}
}
impl Display for RenewOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
