//! Keeps a leased secret alive against a Vault-compatible server until renewal ends.
//!
//! ```sh
//! VAULT_ADDR=http://127.0.0.1:8200 VAULT_TOKEN=hvs.xxx LEASE_ID=database/creds/app/abc \
//! 	cargo run --example renew_lease
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
use time::Duration;
// self
use lease_renewer::{
	ClientConfig, Renewer, RenewerConfig, ReqwestRenewClient, Secret, url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let address = Url::parse(&env::var("VAULT_ADDR")?)?;
	let token = env::var("VAULT_TOKEN")?;
	let lease_id = env::var("LEASE_ID")?;
	let client = ReqwestRenewClient::new(
		ClientConfig::new(address).with_token(token).with_timeout_secs(10),
	)?;
	let secret = Secret::for_lease(lease_id, Duration::hours(1), true);
	let renewer: Arc<Renewer<ReqwestRenewClient>> = Arc::new(Renewer::new(
		client,
		RenewerConfig::new(secret).with_grace(Duration::seconds(30)),
	)?);
	let task = renewer.spawn();
	let ctrl_c = tokio::signal::ctrl_c();

	tokio::pin!(ctrl_c);

	loop {
		tokio::select! {
			outcome = renewer.done() => {
				let outcome = outcome.ok_or_else(|| eyre!("renewal outcome was already consumed"))?;

				match outcome {
					Ok(()) => println!("renewal finished on schedule; re-read the secret"),
					Err(e) => println!("renewal ended: {e}; re-read the secret"),
				}

				break;
			},
			Some(tick) = renewer.next_tick() => {
				println!("renewed #{} at {}", tick.sequence, tick.renewed_at);
			},
			_ = &mut ctrl_c, if !renewer.is_stopped() => renewer.stop(),
		}
	}

	task.await?;

	Ok(())
}
