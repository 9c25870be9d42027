//! Server configuration derived from environment variables

use std::env;
use std::path::PathBuf;

use crate::models::symbol::DEFAULT_EXCHANGE;

const ENV_DATABASE_URL: &str = "DATABASE_URL";
const ENV_HOST: &str = "HOST";
const ENV_PORT: &str = "PORT";
const ENV_TOKENS_PATH: &str = "TOKENS_PATH";
const ENV_EXCHANGE_NAME: &str = "EXCHANGE_NAME";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKENS_PATH: &str = "config/tokens.json";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// JSON token list the symbol catalog is built from
    pub tokens_path: PathBuf,
    pub exchange: String,
}

fn env_str(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var(ENV_DATABASE_URL)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("{} must be set", ENV_DATABASE_URL))?;

        Ok(Self {
            database_url,
            host: env_str(ENV_HOST, DEFAULT_HOST),
            port: env_u16(ENV_PORT, DEFAULT_PORT),
            tokens_path: PathBuf::from(env_str(ENV_TOKENS_PATH, DEFAULT_TOKENS_PATH)),
            exchange: env_str(ENV_EXCHANGE_NAME, DEFAULT_EXCHANGE),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
