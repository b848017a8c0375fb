//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::net::IpAddr;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 1234;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_SEED_PATH: &str = "data/movies.json";

/// Local development origins allowed to call the API from a browser.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:8080",
    "http://localhost:1234",
    "http://localhost:3000",
];

/// Listening port (optional, defaults to 1234).
pub fn port() -> anyhow::Result<u16> {
    match std::env::var("PORT") {
        Ok(v) => v
            .trim()
            .parse::<u16>()
            .with_context(|| format!("PORT must be a valid port number, got '{}'", v)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

/// Interface to bind (optional, defaults to all interfaces).
pub fn bind_addr() -> anyhow::Result<IpAddr> {
    let v = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    v.trim()
        .parse::<IpAddr>()
        .with_context(|| format!("BIND_ADDR must be an IP address, got '{}'", v))
}

/// Seed dataset location (optional).
pub fn seed_path() -> PathBuf {
    std::env::var("MOVIES_SEED_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SEED_PATH))
}

/// CORS allow-list. `CORS_ALLOWED_ORIGINS` is a comma-separated override.
pub fn allowed_origins() -> Vec<String> {
    match std::env::var("CORS_ALLOWED_ORIGINS") {
        Ok(v) => parse_origin_list(&v),
        Err(_) => DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Everything the server binary needs at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub seed_path: PathBuf,
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: bind_addr()?,
            port: port()?,
            seed_path: seed_path(),
            allowed_origins: allowed_origins(),
        })
    }
}
