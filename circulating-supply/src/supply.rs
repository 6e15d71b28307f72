use crate::explorer::Explorer;
use crate::{Amount, Error, Result};
use futures::future::BoxFuture;
use futures::{stream, FutureExt, StreamExt, TryStreamExt};
use serde::Serialize;

/// Wallets whose balances do not count towards circulating supply.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExcludedWallets {
	pub burn: Option<String>,
	pub locked: Vec<String>,
}

/// How the lookups of a single request are scheduled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FetchMode {
	/// One lookup at a time, stopping at the first failure.
	Sequential,
	/// Up to `max_in_flight` lookups at once, failing fast.
	Concurrent { max_in_flight: usize },
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisplayFormat {
	#[default]
	Plain,
	/// Thousands separated by commas.
	Grouped,
}

/// Raw amounts gathered for one request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SupplySnapshot {
	pub total_supply: Amount,
	pub burned: Amount,
	pub locked: Vec<Amount>,
}

impl SupplySnapshot {
	/// Burned balance followed by the locked balances.
	pub fn excluded(&self) -> impl Iterator<Item = &Amount> {
		std::iter::once(&self.burned).chain(&self.locked)
	}
}

#[derive(Clone, Copy, Debug)]
enum Lookup<'a> {
	TotalSupply,
	Balance(&'a str),
}

impl Lookup<'_> {
	async fn run(self, explorer: &dyn Explorer) -> Result<Amount> {
		match self {
			Self::TotalSupply => explorer.fetch_total_supply().await,
			Self::Balance(address) => explorer.fetch_wallet_balance(address).await,
		}
	}
}

/// Queries total supply and every excluded wallet.
pub async fn fetch_snapshot(
	explorer: &dyn Explorer,
	wallets: &ExcludedWallets,
	mode: FetchMode,
) -> Result<SupplySnapshot> {
	let mut lookups = vec![Lookup::TotalSupply];
	lookups.extend(wallets.burn.as_deref().map(Lookup::Balance));
	lookups.extend(wallets.locked.iter().map(|wallet| Lookup::Balance(wallet)));

	let mut slots: Vec<Option<Amount>> = vec![None; lookups.len()];
	match mode {
		FetchMode::Sequential => {
			for (index, lookup) in lookups.iter().copied().enumerate() {
				slots[index] = Some(lookup.run(explorer).await?);
			}
		},
		FetchMode::Concurrent { max_in_flight } => {
			let pending: Vec<BoxFuture<'_, Result<(usize, Amount)>>> = lookups
				.iter()
				.copied()
				.enumerate()
				.map(|(index, lookup)| {
					async move { lookup.run(explorer).await.map(|amount| (index, amount)) }.boxed()
				})
				.collect();
			// completion order, so the first error ends the request
			let mut results = stream::iter(pending).buffer_unordered(max_in_flight.max(1));
			while let Some((index, amount)) = results.try_next().await? {
				slots[index] = Some(amount);
			}
		},
	}

	let mut take = |index: usize| {
		slots[index].take().ok_or_else(|| Error::ExternalApi {
			lookup: format!("{:?}", lookups[index]),
			payload: "no result".into(),
		})
	};
	let total_supply = take(0)?;
	let (burned, first_locked) = match wallets.burn {
		Some(_) => (take(1)?, 2),
		None => (Amount::zero(), 1),
	};
	let locked = (first_locked..lookups.len()).map(take).collect::<Result<Vec<_>>>()?;
	Ok(SupplySnapshot { total_supply, burned, locked })
}

/// Exact sum of `amounts`, zero when empty.
pub fn excluded_total<'a>(amounts: impl IntoIterator<Item = &'a Amount>) -> Amount {
	amounts.into_iter().sum()
}

pub fn circulating_supply(total: &Amount, excluded: &Amount) -> Result<Amount> {
	total.checked_sub(excluded).ok_or_else(|| Error::NegativeSupply {
		total: total.clone(),
		excluded: excluded.clone(),
	})
}

/// Whole token count of `value`, rounded down.
///
/// Only meant for presentation: arithmetic must happen on the raw amounts
/// before this is called, and the result must never be descaled again.
pub fn format_display_amount(value: &Amount, decimals: u32) -> String {
	value.whole_tokens(decimals).to_string()
}

fn group_thousands(digits: &str) -> String {
	let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, digit) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}
	grouped
}

impl DisplayFormat {
	pub fn format(self, value: &Amount, decimals: u32) -> String {
		let plain = format_display_amount(value, decimals);
		match self {
			Self::Plain => plain,
			Self::Grouped => group_thousands(&plain),
		}
	}
}

/// Body of a successful circulating supply response.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyReport {
	pub token: String,
	pub total_supply: String,
	pub burned_tokens: String,
	pub locked_tokens: String,
	pub circulating_supply: String,
}

impl SupplyReport {
	pub fn new(
		token: &str,
		snapshot: &SupplySnapshot,
		decimals: u32,
		display: DisplayFormat,
	) -> Result<Self> {
		let locked = excluded_total(&snapshot.locked);
		let excluded = excluded_total(snapshot.excluded());
		let circulating = circulating_supply(&snapshot.total_supply, &excluded)?;
		Ok(Self {
			token: token.into(),
			total_supply: display.format(&snapshot.total_supply, decimals),
			burned_tokens: display.format(&snapshot.burned, decimals),
			locked_tokens: display.format(&locked, decimals),
			circulating_supply: display.format(&circulating, decimals),
		})
	}
}
