use crate::Amount;
use std::time::Duration;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid var `{var}`: {reason}")]
	Configuration { var: &'static str, reason: String },
	#[error("invalid response from {lookup} API: {payload}")]
	ExternalApi { lookup: String, payload: String },
	#[error("explorer request failed: {0}")]
	Transport(#[from] reqwest::Error),
	#[error("{lookup} lookup timed out after {after:?}")]
	Timeout { lookup: String, after: Duration },
	#[error("not an integer amount: {value:?}")]
	Parse { value: String },
	#[error("excluded balances {excluded} exceed total supply {total}")]
	NegativeSupply { total: Amount, excluded: Amount },
}

impl Error {
	pub(crate) fn missing(var: &'static str) -> Self {
		Self::Configuration { var, reason: "missing".into() }
	}

	pub(crate) fn invalid(var: &'static str, reason: impl std::fmt::Display) -> Self {
		Self::Configuration { var, reason: reason.to_string() }
	}
}
