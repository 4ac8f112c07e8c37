//! Runtime configuration types for taskscribe.
//!
//! `AppConfig` is populated from the process environment by
//! `taskscribe_infra::config::load_from_env`. Credentials are held as
//! [`SecretString`] so they never appear in `Debug` output or logs.

use chrono_tz::Tz;
use secrecy::SecretString;
use serde::Serialize;

/// Default Anthropic model used for transcript summarization.
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";

/// Default output token ceiling for the summarization call.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default listening port for the webhook server.
pub const DEFAULT_PORT: u16 = 8000;

/// Default bind address for the webhook server.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Zone whose calendar date titles summary pages.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Detroit;

/// Default Notion REST API base URL.
pub const DEFAULT_NOTION_BASE_URL: &str = "https://api.notion.com";

/// Default Anthropic REST API base URL.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Everything the server and its background jobs need to run.
///
/// Every credential and identifier is optional at load time: the server starts
/// regardless and `/health` reports what is missing. Callers that need a value
/// go through the `require_*` accessors, which turn absence into a
/// [`ConfigError::Missing`].
#[derive(Debug)]
pub struct AppConfig {
    /// Notion integration token (`NOTION_TOKEN`).
    pub notion_token: Option<SecretString>,
    /// Anthropic API key (`ANTHROPIC_API_KEY`).
    pub anthropic_api_key: Option<SecretString>,
    /// Shared webhook signing secret (`WEBHOOK_SECRET`). `None` disables
    /// signature verification.
    pub webhook_secret: Option<SecretString>,
    /// Page under which summary pages are created (`NOTION_PARENT_PAGE_ID`).
    pub parent_page_id: Option<String>,
    /// Database whose records carry transcripts (`NOTION_DATABASE_ID`).
    pub database_id: Option<String>,
    /// Bind address (`HOST`).
    pub host: String,
    /// Listening port (`PORT`).
    pub port: u16,
    /// Anthropic model identifier (`ANTHROPIC_MODEL`).
    pub anthropic_model: String,
    /// Output token ceiling (`ANTHROPIC_MAX_TOKENS`).
    pub anthropic_max_tokens: u32,
    /// Notion API base URL (`NOTION_API_BASE_URL`).
    pub notion_base_url: String,
    /// Anthropic API base URL (`ANTHROPIC_API_BASE_URL`).
    pub anthropic_base_url: String,
    /// IANA zone used to date pages and prompts (`TIMEZONE`).
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notion_token: None,
            anthropic_api_key: None,
            webhook_secret: None,
            parent_page_id: None,
            database_id: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_max_tokens: DEFAULT_MAX_TOKENS,
            notion_base_url: DEFAULT_NOTION_BASE_URL.to_string(),
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl AppConfig {
    /// Which pieces of configuration are present, for the health endpoint.
    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            notion_configured: self.notion_token.is_some(),
            claude_configured: self.anthropic_api_key.is_some(),
            webhook_secret_configured: self.webhook_secret.is_some(),
            parent_page_configured: self.parent_page_id.is_some(),
            database_configured: self.database_id.is_some(),
        }
    }

    pub fn require_notion_token(&self) -> Result<&SecretString, ConfigError> {
        self.notion_token
            .as_ref()
            .ok_or(ConfigError::Missing("NOTION_TOKEN"))
    }

    pub fn require_anthropic_api_key(&self) -> Result<&SecretString, ConfigError> {
        self.anthropic_api_key
            .as_ref()
            .ok_or(ConfigError::Missing("ANTHROPIC_API_KEY"))
    }

    pub fn require_database_id(&self) -> Result<&str, ConfigError> {
        self.database_id
            .as_deref()
            .ok_or(ConfigError::Missing("NOTION_DATABASE_ID"))
    }
}

/// Presence flags reported by `GET /health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigStatus {
    pub notion_configured: bool,
    pub claude_configured: bool,
    pub webhook_secret_configured: bool,
    pub parent_page_configured: bool,
    pub database_configured: bool,
}

/// Errors raised while loading or reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required setting {0} is not configured")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
