use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Directory of browser assets served for any non-API path.
    pub static_dir: PathBuf,
    pub cheapshark_base_url: String,
    pub steam_base_url: String,
    pub user_agent: String,
    /// Fixed per-request timeout for every upstream call.
    pub request_timeout_secs: u64,
    /// How long a fetched store directory is considered fresh.
    pub store_cache_ttl_secs: u64,
}
