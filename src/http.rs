//! Reqwest-backed [`RenewClient`] for Vault-compatible HTTP APIs.
//!
//! Token renewal calls `PUT /v1/auth/token/renew-self` with the token itself in
//! `X-Vault-Token`; lease renewal calls `PUT /v1/sys/leases/renew` with the client's own token.
//! Both send the increment in whole seconds, where zero asks for the service default.

// crates.io
use reqwest::{
	StatusCode,
	header::{CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	client::{RenewClient, RenewFuture},
	error::{ConfigError, TransportError},
	secret::{Secret, TokenSecret},
};

const TOKEN_HEADER: &str = "X-Vault-Token";
const RENEW_SELF_PATH: &str = "v1/auth/token/renew-self";
const RENEW_LEASE_PATH: &str = "v1/sys/leases/renew";

/// Settings for [`ReqwestRenewClient`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
	/// Base address of the service, e.g. `https://vault.internal:8200`.
	pub address: Url,
	/// Token used to authorize lease renewals.
	#[serde(default)]
	pub token: Option<TokenSecret>,
	/// Per-request timeout in seconds; bounds how long a stop can wait on an in-flight call.
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}
impl ClientConfig {
	/// Creates a configuration pointing at `address` with no token and no timeout.
	pub fn new(address: Url) -> Self {
		Self { address, token: None, timeout_secs: None }
	}

	/// Sets the token used for lease renewals.
	pub fn with_token(mut self, token: impl Into<TokenSecret>) -> Self {
		self.token = Some(token.into());

		self
	}

	/// Sets the per-request timeout.
	pub fn with_timeout_secs(mut self, secs: u64) -> Self {
		self.timeout_secs = Some(secs);

		self
	}
}

/// HTTP collaborator issuing renewal calls through reqwest.
///
/// Renewal endpoints answer directly; configure any custom [`ReqwestClient`] to avoid
/// following redirects so tokens are never replayed to another origin.
#[derive(Clone, Debug)]
pub struct ReqwestRenewClient {
	http: ReqwestClient,
	address: Url,
	token: Option<TokenSecret>,
}
impl ReqwestRenewClient {
	/// Builds a client with its own reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder().redirect(reqwest::redirect::Policy::none());

		if let Some(secs) = config.timeout_secs {
			builder = builder.timeout(std::time::Duration::from_secs(secs));
		}

		let http = builder.build()?;

		Self::with_client(http, config)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(http: ReqwestClient, config: ClientConfig) -> Result<Self, ConfigError> {
		let mut address = config.address;

		if address.cannot_be_a_base() {
			return Err(ConfigError::InvalidAddress {
				address: address.to_string(),
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}
		// `Url::join` drops the last segment unless the base ends with a slash.
		if !address.path().ends_with('/') {
			let path = format!("{}/", address.path());

			address.set_path(&path);
		}

		Ok(Self { http, address, token: config.token })
	}

	/// Base address requests are resolved against.
	pub fn address(&self) -> &Url {
		&self.address
	}

	fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
		self.address.join(path).map_err(|source| {
			ConfigError::InvalidAddress { address: self.address.to_string(), source }.into()
		})
	}

	async fn put(
		&self,
		path: &str,
		token: Option<&TokenSecret>,
		body: serde_json::Value,
	) -> Result<Option<Secret>, TransportError> {
		let url = self.endpoint(path)?;
		let mut request = self
			.http
			.put(url)
			.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.body(body.to_string());

		if let Some(token) = token {
			request = request.header(TOKEN_HEADER, token.expose());
		}

		let response = request.send().await?;
		let status = response.status();
		let bytes = response.bytes().await?;

		if !status.is_success() {
			return Err(TransportError::Status {
				status: status.as_u16(),
				errors: parse_errors(&bytes),
			});
		}
		if status == StatusCode::NO_CONTENT || is_empty_body(&bytes) {
			return Ok(None);
		}

		Ok(Some(Secret::from_json(&bytes)?))
	}
}
impl RenewClient for ReqwestRenewClient {
	type Error = TransportError;

	fn renew_token_as_self<'a>(
		&'a self,
		token: &'a TokenSecret,
		increment: Duration,
	) -> RenewFuture<'a, Self::Error> {
		let body = serde_json::json!({ "increment": increment.whole_seconds() });

		Box::pin(self.put(RENEW_SELF_PATH, Some(token), body))
	}

	fn renew_lease<'a>(
		&'a self,
		lease_id: &'a str,
		increment: Duration,
	) -> RenewFuture<'a, Self::Error> {
		let body =
			serde_json::json!({ "lease_id": lease_id, "increment": increment.whole_seconds() });

		Box::pin(self.put(RENEW_LEASE_PATH, self.token.as_ref(), body))
	}
}

#[derive(Deserialize)]
struct ErrorBody {
	#[serde(default)]
	errors: Vec<String>,
}

fn is_empty_body(bytes: &[u8]) -> bool {
	let body = bytes.trim_ascii();

	body.is_empty() || body == b"null"
}

fn parse_errors(bytes: &[u8]) -> Vec<String> {
	serde_json::from_slice::<ErrorBody>(bytes).map(|body| body.errors).unwrap_or_default()
}
