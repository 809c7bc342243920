use std::net::SocketAddr;
use std::time::Duration;

use crate::providers::crypto_compare_provider::DEFAULT_FEED_URL;

/// Process configuration read from the environment (with optional `.env`).
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub feed_url: String,
    /// Base symbols tracked from startup.
    pub tracked_symbols: Vec<String>,
    /// Quote symbols every tracked currency is priced against.
    pub quote_symbols: Vec<String>,
    pub poll_interval: Duration,
    pub fetch_timeout: Duration,
    pub provision_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("EXCHANGE_LISTEN_ADDR", "0.0.0.0:8082")
            .parse()
            .expect("Invalid EXCHANGE_LISTEN_ADDR");
        let db_path = env_or("EXCHANGE_DB_PATH", "./db/exchange.db");
        let feed_url = env_or("EXCHANGE_FEED_URL", DEFAULT_FEED_URL);
        let tracked_symbols = split_symbols(&env_or("EXCHANGE_TRACKED", "BTC,ETH"));
        let quote_symbols = split_symbols(&env_or("EXCHANGE_QUOTES", "USD,JPY,EUR"));
        let poll_interval = Duration::from_secs(parse_or("EXCHANGE_POLL_INTERVAL_SECS", 10));
        let fetch_timeout = Duration::from_secs(parse_or("EXCHANGE_FETCH_TIMEOUT_SECS", 10));
        let provision_timeout =
            Duration::from_millis(parse_or("EXCHANGE_PROVISION_TIMEOUT_MS", 3000));

        Self {
            listen_addr,
            db_path,
            feed_url,
            tracked_symbols,
            quote_symbols,
            poll_interval,
            fetch_timeout,
            provision_timeout,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn split_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}
