#![cfg(not(tarpaulin_include))]

use livelo_analytics::app;
use livelo_analytics::config::Config;

/// Main entry point for the dashboard server
///
/// Reads configuration from the environment (see `Config::from_env`), loads
/// the offers table and serves the dashboard until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("livelo_analytics=info,tower_http=info"),
    )
    .init();

    let config = Config::from_env()?;
    app::run(config).await
}
