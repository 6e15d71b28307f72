use crate::env::ExplorerConfig;
use crate::limiter::RateLimiter;
use crate::{Amount, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

/// Read-only queries against a ledger indexing service.
#[async_trait]
pub trait Explorer: Send + Sync {
	/// Total minted supply of the configured token.
	async fn fetch_total_supply(&self) -> Result<Amount>;

	/// Balance of `address` in the configured token.
	async fn fetch_wallet_balance(&self, address: &str) -> Result<Amount>;
}

#[derive(Deserialize)]
struct Envelope {
	status: String,
	result: serde_json::Value,
}

/// Client for Etherscan style explorers (Polygonscan, Etherscan, BscScan, ...).
pub struct EtherscanClient {
	client: Client,
	config: ExplorerConfig,
	limiter: Arc<dyn RateLimiter>,
}

impl EtherscanClient {
	pub fn new(config: ExplorerConfig) -> Result<Self> {
		let limiter = config.throttle.build();
		Self::with_limiter(config, limiter)
	}

	pub fn with_limiter(config: ExplorerConfig, limiter: Arc<dyn RateLimiter>) -> Result<Self> {
		let client = Client::builder().build()?;
		Ok(Self { client, config, limiter })
	}

	/// Waiting for the limiter counts towards the request timeout.
	async fn query(&self, lookup: &str, params: &[(&str, &str)]) -> Result<Amount> {
		let after = self.config.request_timeout;
		tokio::time::timeout(after, self.send(lookup, params))
			.await
			.map_err(|_| Error::Timeout { lookup: lookup.into(), after })?
	}

	async fn send(&self, lookup: &str, params: &[(&str, &str)]) -> Result<Amount> {
		self.limiter.acquire().await;
		let request = self
			.client
			.get(&self.config.api_url)
			.query(params)
			.query(&[("apikey", self.config.api_key.as_str())])
			.build()
			.map_err(|err| Error::Transport(err.without_url()))?;
		tracing::debug!(lookup, ?params, "querying explorer");
		let resp = self
			.client
			.execute(request)
			.await
			.map_err(|err| Error::Transport(err.without_url()))?;
		let status = resp.status();
		let body = resp.text().await.map_err(|err| Error::Transport(err.without_url()))?;
		if !status.is_success() {
			return Err(Error::ExternalApi {
				lookup: lookup.into(),
				payload: format!("{status} {body}"),
			});
		}
		parse_envelope(lookup, &body)
	}
}

/// Extracts the amount from an explorer response body.
fn parse_envelope(lookup: &str, body: &str) -> Result<Amount> {
	let invalid = || Error::ExternalApi {
		lookup: lookup.into(),
		payload: body.into(),
	};
	let envelope: Envelope = serde_json::from_str(body).map_err(|_| invalid())?;
	if envelope.status != "1" {
		return Err(invalid());
	}
	match envelope.result {
		serde_json::Value::String(result) => result.parse(),
		_ => Err(invalid()),
	}
}

#[async_trait]
impl Explorer for EtherscanClient {
	async fn fetch_total_supply(&self) -> Result<Amount> {
		let contract = self.config.contract_address.as_str();
		self.query(
			"totalSupply",
			&[("module", "stats"), ("action", "tokensupply"), ("contractaddress", contract)],
		)
		.await
	}

	async fn fetch_wallet_balance(&self, address: &str) -> Result<Amount> {
		let contract = self.config.contract_address.as_str();
		self.query(
			"wallet balance",
			&[
				("module", "account"),
				("action", "tokenbalance"),
				("contractaddress", contract),
				("address", address),
				("tag", "latest"),
			],
		)
		.await
	}
}
