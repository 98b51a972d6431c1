//! Background renewal watchdog for Vault-style credentials: keeps an auth token or a leased
//! secret alive until renewal fails, stops paying off, or the caller cancels it.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod error;
#[cfg(feature = "reqwest")] pub mod http;
pub mod obs;
pub mod renewer;
pub mod secret;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	#[cfg(feature = "reqwest")]
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use client::{RenewClient, RenewFuture};
pub use error::{ConfigError, Error, Result, TransportError};
#[cfg(feature = "reqwest")] pub use http::{ClientConfig, ReqwestRenewClient};
#[cfg(feature = "reqwest")] pub use reqwest;
pub use renewer::{
	DEFAULT_RENEWER_GRACE, MIN_RENEW_INTERVAL, RenewTick, RenewalMetrics, Renewer, RenewerConfig,
	TICK_CHANNEL_CAPACITY,
};
pub use secret::{Secret, SecretAuth, TokenSecret};
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
