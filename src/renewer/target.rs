//! Credential-kind dispatch for the renewal loop.

// self
use crate::{
	_prelude::*,
	client::{RenewClient, RenewFuture},
	obs::RenewKind,
	secret::{Secret, TokenSecret},
};

/// What a run renews, fixed once from the input secret.
#[derive(Clone, Debug)]
pub(crate) enum RenewTarget {
	Auth { token: TokenSecret, renewable: bool },
	Lease { lease_id: String, renewable: bool },
}
impl RenewTarget {
	/// Picks the auth variant whenever the secret carries an auth block.
	pub(crate) fn from_secret(secret: &Secret) -> Self {
		match &secret.auth {
			Some(auth) =>
				Self::Auth { token: auth.client_token.clone(), renewable: auth.renewable },
			None => Self::Lease { lease_id: secret.lease_id.clone(), renewable: secret.renewable },
		}
	}

	pub(crate) fn kind(&self) -> RenewKind {
		match self {
			Self::Auth { .. } => RenewKind::Auth,
			Self::Lease { .. } => RenewKind::Lease,
		}
	}

	pub(crate) fn ensure_renewable(&self) -> Result<()> {
		let renewable = match self {
			Self::Auth { token, renewable } => *renewable && !token.is_empty(),
			Self::Lease { lease_id, renewable } => *renewable && !lease_id.is_empty(),
		};

		if renewable { Ok(()) } else { Err(Error::NotRenewable) }
	}

	/// Issues one renewal call with a zero increment.
	pub(crate) fn renew<'a, C>(&'a self, client: &'a C) -> RenewFuture<'a, C::Error>
	where
		C: ?Sized + RenewClient,
	{
		match self {
			Self::Auth { token, .. } => client.renew_token_as_self(token, Duration::ZERO),
			Self::Lease { lease_id, .. } => client.renew_lease(lease_id, Duration::ZERO),
		}
	}

	/// Extracts the lease that governs scheduling from a renewal response.
	///
	/// Token renewals are judged by the token's own lease, never by the envelope's.
	pub(crate) fn lease_of(&self, renewal: &Secret) -> Option<RenewedLease> {
		match self {
			Self::Auth { .. } => renewal
				.auth
				.as_ref()
				.map(|auth| RenewedLease { renewable: auth.renewable, ttl: auth.lease_ttl() }),
			Self::Lease { .. } =>
				Some(RenewedLease { renewable: renewal.renewable, ttl: renewal.lease_ttl() }),
		}
	}
}

/// Renewability and remaining lifetime reported by one renewal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RenewedLease {
	pub(crate) renewable: bool,
	pub(crate) ttl: Duration,
}
