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
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset so `.env` templates can leave keys empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| invalid(var, e.to_string()))
    };

    let parse_positive_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        match raw.parse::<usize>() {
            Ok(0) => Err(invalid(var, "must be greater than zero".to_string())),
            Ok(value) => Ok(value),
            Err(e) => Err(invalid(var, e.to_string())),
        }
    };

    let env = parse_environment(&or_default("SHOPCARD_ENV", "development"))?;

    let bind_addr = or_default("SHOPCARD_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SHOPCARD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SHOPCARD_LOG_LEVEL", "info");
    let profile_path = optional("SHOPCARD_PROFILE_PATH").map(PathBuf::from);
    let storage_dir = optional("SHOPCARD_STORAGE_DIR").map(PathBuf::from);

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("SHOPCARD_GEMINI_MODEL", "gemini-1.5-flash");
    let gemini_base_url = or_default(
        "SHOPCARD_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let ai_timeout_secs = parse_u64("SHOPCARD_AI_TIMEOUT_SECS", "20")?;
    let ai_max_concurrent = parse_positive_usize("SHOPCARD_AI_MAX_CONCURRENT", "2")?;
    let max_cards = parse_positive_usize("SHOPCARD_MAX_CARDS", "8")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        profile_path,
        storage_dir,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        ai_timeout_secs,
        ai_max_concurrent,
        max_cards,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHOPCARD_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
