use crate::limiter::Throttle;
use crate::supply::{DisplayFormat, ExcludedWallets, FetchMode};
use crate::{Error, Result, DEFAULT_DECIMALS};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BURN_ADDRESS: &str = "0x000000000000000000000000000000000000dead";
pub const DEFAULT_API_URL: &str = "https://api.polygonscan.com/api";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 5;
const DEFAULT_RATE_LIMIT: u32 = 5;
const DEFAULT_THROTTLE_DELAY_MS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
/// Decimal digits of the largest uint256.
const MAX_DECIMALS: u32 = 77;

/// Connection settings for the explorer API.
#[derive(Clone, Debug)]
pub struct ExplorerConfig {
	pub api_url: String,
	pub api_key: String,
	pub contract_address: String,
	pub request_timeout: Duration,
	pub throttle: Throttle,
}

/// Service configuration, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
	pub port: u16,
	pub explorer: ExplorerConfig,
	pub wallets: ExcludedWallets,
	pub decimals: u32,
	pub fetch_mode: FetchMode,
	pub display: DisplayFormat,
}

impl Config {
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let required = |var: &'static str| lookup(var).ok_or_else(|| Error::missing(var));
		let contract_address = required("CONTRACT_ADDRESS")?;
		if contract_address.trim().is_empty() {
			return Err(Error::invalid("CONTRACT_ADDRESS", "empty"));
		}
		let api_key = required("EXPLORER_API_KEY")?;
		let locked = parse_wallets(&required("LOCKED_WALLETS")?);
		let burn = match lookup("BURN_ADDRESS") {
			Some(burn) if burn.trim().is_empty() => None,
			Some(burn) => Some(burn.trim().to_string()),
			None => Some(DEFAULT_BURN_ADDRESS.to_string()),
		};

		let parse = |var: &'static str| lookup(var).filter(|value| !value.trim().is_empty());
		let port = parse_or(parse("PORT"), "PORT", DEFAULT_PORT)?;
		let decimals = parse_or(parse("TOKEN_DECIMALS"), "TOKEN_DECIMALS", DEFAULT_DECIMALS)?;
		if decimals > MAX_DECIMALS {
			return Err(Error::invalid("TOKEN_DECIMALS", format!("must be at most {MAX_DECIMALS}")));
		}
		let max_in_flight = parse_or(
			parse("MAX_CONCURRENT_LOOKUPS"),
			"MAX_CONCURRENT_LOOKUPS",
			DEFAULT_MAX_CONCURRENT_LOOKUPS,
		)?;
		if max_in_flight == 0 {
			return Err(Error::invalid("MAX_CONCURRENT_LOOKUPS", "must be at least 1"));
		}
		let fetch_mode = match parse("FETCH_MODE").as_deref().map(str::trim) {
			None | Some("concurrent") => FetchMode::Concurrent { max_in_flight },
			Some("sequential") => FetchMode::Sequential,
			Some(other) => return Err(Error::invalid("FETCH_MODE", format!("unknown mode {other}"))),
		};
		let display = match parse("DISPLAY_FORMAT").as_deref().map(str::trim) {
			None | Some("plain") => DisplayFormat::Plain,
			Some("grouped") => DisplayFormat::Grouped,
			Some(other) => {
				return Err(Error::invalid("DISPLAY_FORMAT", format!("unknown format {other}")))
			},
		};

		let rate_limit =
			parse_or(parse("RATE_LIMIT_PER_SECOND"), "RATE_LIMIT_PER_SECOND", DEFAULT_RATE_LIMIT)?;
		if rate_limit == 0 {
			return Err(Error::invalid("RATE_LIMIT_PER_SECOND", "must be at least 1"));
		}
		let delay_ms =
			parse_or(parse("THROTTLE_DELAY_MS"), "THROTTLE_DELAY_MS", DEFAULT_THROTTLE_DELAY_MS)?;
		let throttle = match parse("THROTTLE").as_deref().map(str::trim) {
			None | Some("token-bucket") => Throttle::TokenBucket {
				per_second: rate_limit,
				burst: rate_limit,
			},
			Some("fixed-delay") => Throttle::FixedDelay(Duration::from_millis(delay_ms)),
			Some("none") => Throttle::None,
			Some(other) => return Err(Error::invalid("THROTTLE", format!("unknown throttle {other}"))),
		};
		let timeout_ms =
			parse_or(parse("REQUEST_TIMEOUT_MS"), "REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS)?;

		Ok(Self {
			port,
			explorer: ExplorerConfig {
				api_url: parse("EXPLORER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
				api_key,
				contract_address: contract_address.trim().into(),
				request_timeout: Duration::from_millis(timeout_ms),
				throttle,
			},
			wallets: ExcludedWallets { burn, locked },
			decimals,
			fetch_mode,
			display,
		})
	}

	pub fn socket_addr(&self) -> SocketAddr {
		SocketAddr::from(([0, 0, 0, 0], self.port))
	}
}

fn parse_wallets(list: &str) -> Vec<String> {
	list.split(',')
		.map(str::trim)
		.filter(|wallet| !wallet.is_empty())
		.map(Into::into)
		.collect()
}

fn parse_or<T>(value: Option<String>, var: &'static str, default: T) -> Result<T>
where
	T: std::str::FromStr,
	T::Err: std::fmt::Display,
{
	match value {
		Some(value) => value.trim().parse().map_err(|err| Error::invalid(var, err)),
		None => Ok(default),
	}
}
