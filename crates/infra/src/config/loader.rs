//! Configuration loader
//!
//! Loads the sync service credentials from the process environment, after
//! merging a `.env` file from the working directory if one exists. Variables
//! already set in the environment win over `.env` entries.
//!
//! ## Environment Variables
//! - `CIPHEROWL_CLIENT_ID`: OAuth client identifier (required)
//! - `CIPHEROWL_CLIENT_SECRET`: OAuth client secret (required)
//! - `CIPHEROWL_UPLOAD_ENABLED`: whether the report upload runs each cycle
//!   (true/false, default false)

use guardian_domain::constants::ENV_PREFIX;
use guardian_domain::{AppConfig, GuardianError, Result};

/// Load credentials: `.env` first, then the environment.
///
/// # Errors
/// Returns `GuardianError::Config` if either credential is missing or blank.
pub fn load() -> Result<AppConfig> {
    load_dotenv();
    let config = load_from_env()?;
    tracing::info!(client_id = %config.client_id, "Configuration loaded from environment");
    Ok(config)
}

/// Merge `.env` into the process environment. A missing file is normal; a
/// malformed one is logged and otherwise ignored.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(err) if err.not_found() => tracing::debug!("No .env file found"),
        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable .env file"),
    }
}

/// Load credentials from environment variables only.
///
/// # Errors
/// Returns `GuardianError::Config` naming the missing variable.
pub fn load_from_env() -> Result<AppConfig> {
    let client_id = env_var("CLIENT_ID")?;
    let client_secret = env_var("CLIENT_SECRET")?;
    AppConfig::new(client_id, client_secret)
}

/// `CIPHEROWL_UPLOAD_ENABLED`, defaulting to off.
pub fn upload_enabled_from_env() -> bool {
    env_bool(&var_name("UPLOAD_ENABLED"), false)
}

/// Full variable name for `key` under the fixed prefix.
pub fn var_name(key: &str) -> String {
    format!("{ENV_PREFIX}{key}")
}

fn env_var(key: &str) -> Result<String> {
    let name = var_name(key);
    match std::env::var(&name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        Ok(_) => Err(GuardianError::Config(format!("Environment variable {name} is empty"))),
        Err(_) => {
            Err(GuardianError::Config(format!("Missing required environment variable: {name}")))
        }
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set or unrecognised.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
