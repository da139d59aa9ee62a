use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "GAMEOFFERS_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.static_dir.to_str(), Some("./public"));
    assert_eq!(cfg.cheapshark_base_url, "https://www.cheapshark.com/api/1.0");
    assert_eq!(cfg.steam_base_url, "https://store.steampowered.com");
    assert_eq!(cfg.user_agent, "game-offers/1.0 (local dev)");
    assert_eq!(cfg.request_timeout_secs, 20);
    assert_eq!(cfg.store_cache_ttl_secs, 3600);
}

#[test]
fn build_app_config_applies_overrides() {
    let mut map = HashMap::new();
    map.insert("GAMEOFFERS_ENV", "production");
    map.insert("GAMEOFFERS_BIND_ADDR", "127.0.0.1:8080");
    map.insert("GAMEOFFERS_STORE_CACHE_TTL_SECS", "60");
    map.insert("GAMEOFFERS_CHEAPSHARK_BASE_URL", "http://localhost:9999/api/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.store_cache_ttl_secs, 60);
    assert_eq!(cfg.cheapshark_base_url, "http://localhost:9999/api");
}

#[test]
fn build_app_config_rejects_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("GAMEOFFERS_BIND_ADDR", "not-an-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAMEOFFERS_BIND_ADDR"),
        "expected InvalidEnvVar(GAMEOFFERS_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_timeout() {
    let mut map = HashMap::new();
    map.insert("GAMEOFFERS_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAMEOFFERS_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(GAMEOFFERS_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_ttl() {
    let mut map = HashMap::new();
    map.insert("GAMEOFFERS_STORE_CACHE_TTL_SECS", "an hour");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAMEOFFERS_STORE_CACHE_TTL_SECS"),
        "expected InvalidEnvVar(GAMEOFFERS_STORE_CACHE_TTL_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("GAMEOFFERS_STEAM_BASE_URL", "ftp://store.steampowered.com");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "GAMEOFFERS_STEAM_BASE_URL"),
        "expected InvalidEnvVar(GAMEOFFERS_STEAM_BASE_URL), got: {result:?}"
    );
}
