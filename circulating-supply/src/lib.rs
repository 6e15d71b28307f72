mod amount;
mod env;
mod error;
pub mod explorer;
pub mod limiter;
pub mod server;
pub mod supply;

#[cfg(test)]
mod mock;

pub use crate::amount::{Amount, DEFAULT_DECIMALS};
pub use crate::env::{Config, ExplorerConfig, DEFAULT_API_URL, DEFAULT_BURN_ADDRESS};
pub use crate::error::{Error, Result};
pub use crate::explorer::{EtherscanClient, Explorer};
pub use crate::server::{router, AppState};
