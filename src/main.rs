//! HTTP server for the bar payroll service.
//!
//! The configuration file is taken from the first argument, then from
//! `PAYROLL_CONFIG`; without either the built-in defaults are used.

use std::error::Error;

use bar_payroll::api::{AppState, create_router};
use bar_payroll::config::ConfigLoader;
use bar_payroll::storage::open_store;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVES: &str = "info,bar_payroll=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PAYROLL_CONFIG").ok());
    let config = ConfigLoader::load_or_default(config_path.as_deref())?;

    let store = open_store(config.storage())?;
    let bind = config.server().bind.clone();
    let router = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(address = %bind, "Payroll server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
