use crate::explorer::Explorer;
use crate::{Amount, Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// In-memory explorer. Unknown wallets fail like a `NOTOK` response.
#[derive(Default)]
pub struct MockExplorer {
	total_supply: Option<Amount>,
	balances: HashMap<String, Amount>,
	latency: Duration,
	total_supply_latency: Duration,
	calls: AtomicUsize,
}

impl MockExplorer {
	pub fn new(total_supply: Amount) -> Self {
		Self {
			total_supply: Some(total_supply),
			..Default::default()
		}
	}

	/// Explorer that fails every total supply lookup.
	pub fn failing() -> Self {
		Self::default()
	}

	pub fn with_balance(mut self, address: &str, balance: Amount) -> Self {
		self.balances.insert(address.into(), balance);
		self
	}

	pub fn with_latency(mut self, latency: Duration) -> Self {
		self.latency = latency;
		self
	}

	/// Extra delay before answering total supply lookups.
	pub fn with_total_supply_latency(mut self, latency: Duration) -> Self {
		self.total_supply_latency = latency;
		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	async fn respond(&self, lookup: &str, amount: Option<&Amount>) -> Result<Amount> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		if !self.latency.is_zero() {
			tokio::time::sleep(self.latency).await;
		}
		amount.cloned().ok_or_else(|| Error::ExternalApi {
			lookup: lookup.into(),
			payload: r#"{"status":"0","message":"NOTOK","result":"Error!"}"#.into(),
		})
	}
}

#[async_trait]
impl Explorer for MockExplorer {
	async fn fetch_total_supply(&self) -> Result<Amount> {
		if !self.total_supply_latency.is_zero() {
			tokio::time::sleep(self.total_supply_latency).await;
		}
		self.respond("totalSupply", self.total_supply.as_ref()).await
	}

	async fn fetch_wallet_balance(&self, address: &str) -> Result<Amount> {
		self.respond("wallet balance", self.balances.get(address)).await
	}
}
