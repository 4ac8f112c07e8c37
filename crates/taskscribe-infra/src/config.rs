//! Environment configuration loader for taskscribe.
//!
//! Reads an optional `.env` file from the working directory, then builds
//! [`AppConfig`] from process environment variables. Unset and empty
//! variables are treated the same: optional values become `None` and
//! defaulted values keep their default.

use secrecy::SecretString;

use taskscribe_types::config::{AppConfig, ConfigError};

/// Load `.env` (if present) and read configuration from the environment.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to read .env, continuing with process environment"),
    }
    from_lookup(|key| std::env::var(key).ok())
}

/// Build configuration from an arbitrary key lookup.
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let defaults = AppConfig::default();

    Ok(AppConfig {
        notion_token: get("NOTION_TOKEN").map(SecretString::from),
        anthropic_api_key: get("ANTHROPIC_API_KEY").map(SecretString::from),
        webhook_secret: get("WEBHOOK_SECRET").map(SecretString::from),
        parent_page_id: get("NOTION_PARENT_PAGE_ID"),
        database_id: get("NOTION_DATABASE_ID"),
        host: get("HOST").unwrap_or(defaults.host),
        port: parse_or("PORT", get("PORT"), defaults.port)?,
        anthropic_model: get("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
        anthropic_max_tokens: parse_or(
            "ANTHROPIC_MAX_TOKENS",
            get("ANTHROPIC_MAX_TOKENS"),
            defaults.anthropic_max_tokens,
        )?,
        notion_base_url: get("NOTION_API_BASE_URL").unwrap_or(defaults.notion_base_url),
        anthropic_base_url: get("ANTHROPIC_API_BASE_URL").unwrap_or(defaults.anthropic_base_url),
        timezone: parse_or("TIMEZONE", get("TIMEZONE"), defaults.timezone)?,
    })
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("{value:?}: {e}"),
        }),
    }
}
