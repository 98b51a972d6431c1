//! Remote-call contract the renewer depends on.
//!
//! The renewer only ever needs two operations from the issuing service: renew a token using
//! that token as its own identity, and renew a lease by identifier. Implementations own
//! transport concerns (timeouts, TLS, authentication for lease renewal) and must be safe to
//! share between many renewers at once.

// self
use crate::{
	_prelude::*,
	secret::{Secret, TokenSecret},
};

/// Boxed future returned by [`RenewClient`] operations.
///
/// `Ok(None)` means the call succeeded at the transport level but carried no payload.
pub type RenewFuture<'a, E> = Pin<Box<dyn Future<Output = Result<Option<Secret>, E>> + 'a + Send>>;

/// Collaborator that performs renewal calls against the issuing service.
pub trait RenewClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the collaborator.
	type Error: 'static + Send + Sync + StdError;

	/// Renews `token` using the token itself as the caller identity.
	///
	/// A zero `increment` asks the service to apply its default extension.
	fn renew_token_as_self<'a>(
		&'a self,
		token: &'a TokenSecret,
		increment: Duration,
	) -> RenewFuture<'a, Self::Error>;

	/// Renews the lease identified by `lease_id`.
	///
	/// A zero `increment` asks the service to apply its default extension.
	fn renew_lease<'a>(&'a self, lease_id: &'a str, increment: Duration)
	-> RenewFuture<'a, Self::Error>;
}
