// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

/// Base URL of the glot.io run API; the language segment is appended per request.
pub const DEFAULT_EXECUTION_API_URL: &str = "https://glot.io/api/run";

/// Upper bound on the size of a submitted solution, in bytes.
pub const MAX_SOURCE_LEN: u64 = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub server_addr: String,

    /// Optional JSON catalog replacing the built-in problem set.
    pub problems_path: Option<String>,

    pub node_binary: String,
    pub sandbox_call_timeout_ms: u64,
    pub sandbox_memory_limit_mb: u32,

    pub execution_api_url: String,
    /// Without a token the remote execution proxy answers 503.
    pub execution_api_token: Option<String>,
    pub execution_api_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET")
            .expect("JWT_SECRET must be set");

        let jwt_expiration = parse_or("JWT_EXPIRATION", 86_400);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        let server_addr = env::var("SERVER_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let execution_api_url = env::var("EXECUTION_API_URL")
            .unwrap_or_else(|_| DEFAULT_EXECUTION_API_URL.to_string());
        Url::parse(&execution_api_url).expect("EXECUTION_API_URL must be a valid URL");

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            server_addr,
            problems_path: env::var("PROBLEMS_PATH").ok().filter(|p| !p.is_empty()),
            node_binary: env::var("NODE_BINARY").unwrap_or_else(|_| "node".to_string()),
            sandbox_call_timeout_ms: parse_or("SANDBOX_CALL_TIMEOUT_MS", 2_000),
            sandbox_memory_limit_mb: parse_or("SANDBOX_MEMORY_LIMIT_MB", 64),
            execution_api_url,
            execution_api_token: env::var("EXECUTION_API_TOKEN").ok().filter(|t| !t.is_empty()),
            execution_api_timeout_secs: parse_or("EXECUTION_API_TIMEOUT_SECS", 15),
        }
    }

    pub fn sandbox_call_timeout(&self) -> Duration {
        Duration::from_millis(self.sandbox_call_timeout_ms)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
