use std::{net::SocketAddr, time::Duration};

use watchledger_core::constants::DEFAULT_QUOTE_CURRENCY;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub default_quote: String,
    pub scheduler_enabled: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("WL_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid WL_LISTEN_ADDR");
        let db_path = std::env::var("WL_DB_PATH").unwrap_or_else(|_| "./db/watchledger.db".into());
        let default_quote = std::env::var("WL_DEFAULT_QUOTE")
            .unwrap_or_else(|_| DEFAULT_QUOTE_CURRENCY.to_string())
            .trim()
            .to_ascii_uppercase();
        let scheduler_enabled = std::env::var("WL_SCHEDULER_ENABLED")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let cors_allow = std::env::var("WL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("WL_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Self {
            listen_addr,
            db_path,
            default_quote,
            scheduler_enabled,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        }
    }
}
