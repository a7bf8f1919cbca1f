//! Seller fee server.
//!
//! Loads the marketplace rate sheets once and serves the fee API.
//!
//! Environment:
//! - `FEE_ENGINE_CONFIG`: rate-sheet directory (default `./config/marketplace`)
//! - `PORT`: listen port (default `5000`)
//! - `RUST_LOG`: log filter, on top of the `info` default

use std::env;
use std::net::SocketAddr;

use seller_fee_engine::api::{AppState, create_router};
use seller_fee_engine::config::ConfigLoader;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

const DEFAULT_CONFIG_DIR: &str = "./config/marketplace";
const DEFAULT_PORT: u16 = 5000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_dir = env::var("FEE_ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let port = match env::var("PORT") {
        Ok(value) => value.parse::<u16>()?,
        Err(_) => DEFAULT_PORT,
    };

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        marketplace = %config.metadata().name,
        currency = %config.metadata().currency,
        "Rate sheets loaded"
    );

    let app = create_router(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server started");

    axum::serve(listener, app).await?;
    Ok(())
}
