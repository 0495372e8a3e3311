use crate::error::{LiveloError, Result};
use crate::extractor::DEFAULT_AFFIRMATIVE;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Offers export to load at startup (`.csv` or `.bin.gz`)
    pub data_path: Option<PathBuf>,

    /// Directory holding the persisted favorites and theme
    pub storage_dir: PathBuf,

    /// Address the dashboard server binds to
    pub bind_addr: SocketAddr,

    /// Offer-column text that means "on offer"
    pub affirmative: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: None,
            storage_dir: PathBuf::from(".livelo"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            affirmative: DEFAULT_AFFIRMATIVE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = lookup("LIVELO_DATA") {
            config.data_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = lookup("LIVELO_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }

        let host: IpAddr = match lookup("LIVELO_HOST") {
            Some(host) => host
                .parse()
                .map_err(|_| LiveloError::Config(format!("invalid LIVELO_HOST `{}`", host)))?,
            None => config.bind_addr.ip(),
        };
        let port: u16 = match lookup("LIVELO_PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| LiveloError::Config(format!("invalid LIVELO_PORT `{}`", port)))?,
            None => config.bind_addr.port(),
        };
        config.bind_addr = SocketAddr::new(host, port);

        if let Some(affirmative) = lookup("LIVELO_AFFIRMATIVE") {
            if !affirmative.trim().is_empty() {
                config.affirmative = affirmative.trim().to_string();
            }
        }

        Ok(config)
    }
}
