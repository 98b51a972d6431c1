//! Renewer error types shared across construction, the renewal loop, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical renewer error exposed by public APIs.
///
/// Construction failures surface synchronously from [`Renewer::new`](crate::Renewer::new);
/// every other variant is only ever delivered as the terminal outcome of a renewal run.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The credential was never renewable, or the issuing service stopped allowing renewal.
	#[error("Secret is not renewable.")]
	NotRenewable,
	/// The renewal call succeeded but returned no usable payload.
	#[error("Renewal returned empty secret data.")]
	NoSecretData,
	/// The remote renewal call itself failed; the collaborator error is propagated verbatim.
	#[error(transparent)]
	Remote(BoxError),
}
impl Error {
	/// Wraps a collaborator failure inside [`Error::Remote`].
	pub fn remote(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Remote(Box::new(src))
	}

	/// Returns the collaborator error when this is [`Error::Remote`] and the types match.
	pub fn remote_source<E>(&self) -> Option<&E>
	where
		E: 'static + std::error::Error,
	{
		match self {
			Self::Remote(source) => source.downcast_ref::<E>(),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while building renewers or clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No renewer configuration was supplied.
	#[error("Missing input to renewer.")]
	MissingInput,
	/// The renewer configuration does not carry a secret.
	#[error("Missing secret to renew.")]
	MissingSecret,
	/// Grace periods must not be negative.
	#[error("Renewer grace must not be negative, got {grace}.")]
	NegativeGrace {
		/// Rejected grace value.
		grace: Duration,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Service address cannot be joined with an API path.
	#[error("Service address `{address}` is invalid.")]
	InvalidAddress {
		/// Offending address.
		address: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised by the built-in HTTP collaborator.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the renewal endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The service rejected the request.
	#[error("Renewal endpoint responded with status {status}: {}.", display_errors(.errors))]
	Status {
		/// HTTP status code.
		status: u16,
		/// Error strings reported by the service, if any.
		errors: Vec<String>,
	},
	/// The response body is not a valid secret envelope.
	#[error("Renewal endpoint returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A request URL could not be built from the configured address.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for TransportError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		Self::Decode { source: e }
	}
}

fn display_errors(errors: &[String]) -> String {
	if errors.is_empty() { "no error details".into() } else { errors.join("; ") }
}
