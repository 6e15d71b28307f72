use anyhow::{Context, Result};
use circulating_supply::{router, AppState, Config, EtherscanClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

async fn server(config: Config) -> Result<()> {
	let addr = config.socket_addr();
	tracing::info!(
		token = %config.explorer.contract_address,
		locked_wallets = config.wallets.locked.len(),
		burn = ?config.wallets.burn,
		mode = ?config.fetch_mode,
		throttle = %config.explorer.throttle,
		"starting circulating supply api"
	);
	let explorer = EtherscanClient::new(config.explorer.clone())
		.context("failed to build explorer client")?;
	let app = router(AppState::new(config, Arc::new(explorer)));

	let listener =
		TcpListener::bind(&addr).await.with_context(|| format!("failed to bind {addr}"))?;
	tracing::info!("API running on http://{addr}");
	axum::serve(listener, app).await?;
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	dotenv::dotenv().ok();
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("circulating_supply=debug,tower_http=info,info"));
	let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
	tracing::subscriber::set_global_default(subscriber)?;
	let config = Config::from_env().context("invalid configuration")?;
	server(config).await
}
