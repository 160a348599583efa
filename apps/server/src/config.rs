use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub shutdown_grace: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("SUBTRACK_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid SUBTRACK_LISTEN_ADDR")?;
        let db_path =
            std::env::var("SUBTRACK_DB_PATH").unwrap_or_else(|_| "./db/subscriptions.db".into());
        let cors_allow = std::env::var("SUBTRACK_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("SUBTRACK_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "15000".into())
            .parse()
            .unwrap_or(15000);
        let grace_secs: u64 = std::env::var("SUBTRACK_SHUTDOWN_GRACE_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .unwrap_or(30);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            shutdown_grace: Duration::from_secs(grace_secs),
        })
    }
}
