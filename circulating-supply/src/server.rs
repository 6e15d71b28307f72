use crate::explorer::Explorer;
use crate::supply::{fetch_snapshot, SupplyReport};
use crate::{Config, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

const GREETING: &str =
	"Circulating Supply API is running. Use /circulating-supply to get token data.";
const FETCH_ERROR: &str = "Error fetching data from the explorer.";

#[derive(Clone)]
pub struct AppState {
	config: Arc<Config>,
	explorer: Arc<dyn Explorer>,
}

impl AppState {
	pub fn new(config: Config, explorer: Arc<dyn Explorer>) -> Self {
		Self { config: Arc::new(config), explorer }
	}

	async fn report(&self) -> Result<SupplyReport> {
		let config = &self.config;
		let snapshot =
			fetch_snapshot(self.explorer.as_ref(), &config.wallets, config.fetch_mode).await?;
		SupplyReport::new(
			&config.explorer.contract_address,
			&snapshot,
			config.decimals,
			config.display,
		)
	}
}

async fn root() -> &'static str {
	GREETING
}

async fn circulating_supply(State(state): State<AppState>) -> Response {
	match state.report().await {
		Ok(report) => {
			tracing::info!(circulating = %report.circulating_supply, "computed circulating supply");
			Json(report).into_response()
		},
		Err(err) => {
			tracing::error!("error fetching data: {err}");
			(StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": FETCH_ERROR }))).into_response()
		},
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(root))
		.route("/circulating-supply", get(circulating_supply))
		.route("/api/circulating-supply", get(circulating_supply))
		.layer(
			TraceLayer::new_for_http()
				.make_span_with(DefaultMakeSpan::new().level(Level::INFO))
				.on_request(DefaultOnRequest::new().level(Level::INFO))
				.on_response(DefaultOnResponse::new().level(Level::INFO)),
		)
		.with_state(state)
}
