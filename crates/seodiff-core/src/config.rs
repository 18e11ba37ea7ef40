use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank optional values are treated as unset so an empty line in `.env`
    // does not enable a reporter with an empty credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let env = parse_environment(&or_default("SEODIFF_ENV", "development"))?;
    let log_level = or_default("SEODIFF_LOG_LEVEL", "info");
    let sites_path = PathBuf::from(or_default("SEODIFF_SITES_PATH", "./config/sites.yaml"));

    let request_timeout_secs = parse_u64("SEODIFF_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SEODIFF_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least 1 second".to_string(),
        });
    }
    let user_agent = or_default("SEODIFF_USER_AGENT", "seodiff/0.1 (seo-parity)");
    let pair_delay_ms = parse_u64("SEODIFF_PAIR_DELAY_MS", "1000")?;
    let concurrent_sides = parse_bool("SEODIFF_CONCURRENT_SIDES", "false")?;

    let spreadsheet_id = optional("SEODIFF_SPREADSHEET_ID");
    let service_account_path = optional("SEODIFF_SERVICE_ACCOUNT_PATH").map(PathBuf::from);
    let sheets_access_token = optional("SEODIFF_SHEETS_ACCESS_TOKEN");
    let telegram_bot_token = optional("TELEGRAM_BOT_TOKEN");
    let telegram_chat_id = optional("TELEGRAM_CHAT_ID");

    Ok(AppConfig {
        env,
        log_level,
        sites_path,
        request_timeout_secs,
        user_agent,
        pair_delay_ms,
        concurrent_sides,
        spreadsheet_id,
        service_account_path,
        sheets_access_token,
        telegram_bot_token,
        telegram_chat_id,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SEODIFF_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
