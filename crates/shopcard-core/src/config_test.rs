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
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SHOPCARD_ENV"));
}

#[test]
fn build_app_config_applies_defaults_on_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.profile_path.is_none());
    assert!(cfg.storage_dir.is_none());
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(cfg.gemini_model, "gemini-1.5-flash");
    assert_eq!(
        cfg.gemini_base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(cfg.ai_timeout_secs, 20);
    assert_eq!(cfg.ai_max_concurrent, 2);
    assert_eq!(cfg.max_cards, 8);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("SHOPCARD_ENV", "production");
    map.insert("SHOPCARD_BIND_ADDR", "127.0.0.1:8080");
    map.insert("SHOPCARD_PROFILE_PATH", "./config/cards.yaml");
    map.insert("SHOPCARD_STORAGE_DIR", "/var/lib/shopcard");
    map.insert("GEMINI_API_KEY", "secret-key");
    map.insert("SHOPCARD_AI_TIMEOUT_SECS", "5");
    map.insert("SHOPCARD_MAX_CARDS", "3");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(
        cfg.profile_path.as_deref(),
        Some(std::path::Path::new("./config/cards.yaml"))
    );
    assert_eq!(
        cfg.storage_dir.as_deref(),
        Some(std::path::Path::new("/var/lib/shopcard"))
    );
    assert_eq!(cfg.gemini_api_key.as_deref(), Some("secret-key"));
    assert_eq!(cfg.ai_timeout_secs, 5);
    assert_eq!(cfg.max_cards, 3);
}

#[test]
fn build_app_config_treats_blank_optional_values_as_unset() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    map.insert("SHOPCARD_STORAGE_DIR", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gemini_api_key.is_none());
    assert!(cfg.storage_dir.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("SHOPCARD_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCARD_BIND_ADDR"),
        "expected InvalidEnvVar(SHOPCARD_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("SHOPCARD_AI_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCARD_AI_TIMEOUT_SECS"),
        "expected InvalidEnvVar(SHOPCARD_AI_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_max_cards() {
    let mut map = HashMap::new();
    map.insert("SHOPCARD_MAX_CARDS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCARD_MAX_CARDS"),
        "expected InvalidEnvVar(SHOPCARD_MAX_CARDS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_ai_concurrency() {
    let mut map = HashMap::new();
    map.insert("SHOPCARD_AI_MAX_CONCURRENT", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPCARD_AI_MAX_CONCURRENT"),
        "expected InvalidEnvVar(SHOPCARD_AI_MAX_CONCURRENT), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
