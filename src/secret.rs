//! Credential envelopes returned by the issuing service.
//!
//! A [`Secret`] is either a leased secret (`lease_id` + `lease_duration`) or an auth response
//! (`auth` populated with a client token and the token's own lease). The renewer branches on
//! [`Secret::auth`] once, at the start of a run, and never re-inspects the other half.

pub mod token;

pub use token::TokenSecret;

// crates.io
use serde::Deserializer;
// self
use crate::_prelude::*;

/// Secret envelope as returned by read, login, and renewal endpoints.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
	/// Request identifier assigned by the service.
	pub request_id: String,
	/// Lease identifier used for lease renewal; empty for non-leased secrets.
	pub lease_id: String,
	/// Remaining lease validity, in seconds.
	pub lease_duration: i64,
	/// Whether the lease may be extended.
	pub renewable: bool,
	/// Secret payload.
	#[serde(deserialize_with = "null_as_default")]
	pub data: BTreeMap<String, serde_json::Value>,
	/// Warnings attached to the response.
	#[serde(deserialize_with = "null_as_default")]
	pub warnings: Vec<String>,
	/// Auth block, present for login and token renewal responses.
	pub auth: Option<SecretAuth>,
}
impl Secret {
	/// Builds a leased secret envelope.
	pub fn for_lease(
		lease_id: impl Into<String>,
		lease_duration: Duration,
		renewable: bool,
	) -> Self {
		Self {
			lease_id: lease_id.into(),
			lease_duration: lease_duration.whole_seconds(),
			renewable,
			..Default::default()
		}
	}

	/// Builds an auth envelope carrying the provided client token.
	pub fn for_token(
		token: impl Into<TokenSecret>,
		lease_duration: Duration,
		renewable: bool,
	) -> Self {
		Self {
			auth: Some(SecretAuth {
				client_token: token.into(),
				lease_duration: lease_duration.whole_seconds(),
				renewable,
				..Default::default()
			}),
			..Default::default()
		}
	}

	/// Parses a JSON envelope, reporting the path of the first offending field on failure.
	pub fn from_json(bytes: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
		let mut de = serde_json::Deserializer::from_slice(bytes);

		serde_path_to_error::deserialize(&mut de)
	}

	/// Lease validity as a [`Duration`].
	pub fn lease_ttl(&self) -> Duration {
		Duration::seconds(self.lease_duration)
	}

	/// Client token carried by the auth block, if any.
	pub fn token(&self) -> Option<&TokenSecret> {
		self.auth.as_ref().map(|auth| &auth.client_token)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Secret")
			.field("request_id", &self.request_id)
			.field("lease_id", &self.lease_id)
			.field("lease_duration", &self.lease_duration)
			.field("renewable", &self.renewable)
			.field("data", &self.data.keys().collect::<Vec<_>>())
			.field("warnings", &self.warnings)
			.field("auth", &self.auth)
			.finish()
	}
}

/// Auth block of a [`Secret`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretAuth {
	/// Client token; renewal uses it as its own identity.
	pub client_token: TokenSecret,
	/// Token accessor.
	pub accessor: String,
	/// Policies attached to the token.
	#[serde(deserialize_with = "null_as_default")]
	pub policies: Vec<String>,
	/// Token metadata.
	#[serde(deserialize_with = "null_as_default")]
	pub metadata: BTreeMap<String, String>,
	/// Remaining token validity, in seconds.
	pub lease_duration: i64,
	/// Whether the token may be extended.
	pub renewable: bool,
}
impl SecretAuth {
	/// Token validity as a [`Duration`].
	pub fn lease_ttl(&self) -> Duration {
		Duration::seconds(self.lease_duration)
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
