use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a working
/// development config pointed at the public CheapShark and Steam hosts.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        let trimmed = raw.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(invalid(var, format!("expected an http(s) URL, got \"{raw}\"")));
        }
        Ok(trimmed.to_string())
    };

    let env = parse_environment(&or_default("GAMEOFFERS_ENV", "development"))?;
    let bind_addr = parse_addr("GAMEOFFERS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("GAMEOFFERS_LOG_LEVEL", "info");
    let static_dir = PathBuf::from(or_default("GAMEOFFERS_STATIC_DIR", "./public"));

    let cheapshark_base_url = parse_url(
        "GAMEOFFERS_CHEAPSHARK_BASE_URL",
        "https://www.cheapshark.com/api/1.0",
    )?;
    let steam_base_url = parse_url("GAMEOFFERS_STEAM_BASE_URL", "https://store.steampowered.com")?;
    let user_agent = or_default("GAMEOFFERS_USER_AGENT", "game-offers/1.0 (local dev)");

    let request_timeout_secs = parse_positive_u64("GAMEOFFERS_REQUEST_TIMEOUT_SECS", "20")?;
    let store_cache_ttl_secs = parse_positive_u64("GAMEOFFERS_STORE_CACHE_TTL_SECS", "3600")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        static_dir,
        cheapshark_base_url,
        steam_base_url,
        user_agent,
        request_timeout_secs,
        store_cache_ttl_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GAMEOFFERS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
