//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and polling behavior settings
    #[serde(default)]
    pub watcher: WatcherConfig,

    /// Source document settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Relevance keyword rules
    #[serde(default)]
    pub filter: FilterConfig,

    /// Notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Persisted state settings
    #[serde(default)]
    pub state: StateConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.watcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("watcher.user_agent is empty"));
        }
        if self.watcher.timeout_secs == 0 {
            return Err(AppError::validation("watcher.timeout_secs must be > 0"));
        }
        if self.watcher.poll_interval_secs == 0 {
            return Err(AppError::validation(
                "watcher.poll_interval_secs must be > 0",
            ));
        }
        if self.source.section_heading.trim().is_empty() {
            return Err(AppError::validation("source.section_heading is empty"));
        }
        if self.filter.include.is_empty() {
            return Err(AppError::validation("No include keywords defined"));
        }
        if self.state.path.trim().is_empty() {
            return Err(AppError::validation("state.path is empty"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watcher: WatcherConfig::default(),
            source: SourceConfig::default(),
            filter: FilterConfig::default(),
            notify: NotifyConfig::default(),
            state: StateConfig::default(),
        }
    }
}

/// HTTP client and polling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds, applied to fetch and notify calls
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between poll cycles in seconds
    #[serde(default = "defaults::poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            poll_interval_secs: defaults::poll_interval(),
        }
    }
}

/// Shape of the upstream source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Sniff the payload: JSON when it starts with `[` or `{`, markdown otherwise
    #[default]
    Auto,

    /// JSON listing feed
    Json,

    /// Markdown document with a tracked section
    Markdown,
}

/// Source document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Payload shape
    #[serde(default)]
    pub format: SourceFormat,

    /// Heading prefix that opens the tracked section in markdown sources
    #[serde(default = "defaults::section_heading")]
    pub section_heading: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            format: SourceFormat::default(),
            section_heading: defaults::section_heading(),
        }
    }
}

/// Relevance keyword rules.
///
/// Matching is substring-based on lowercased text; exclude keywords take
/// precedence over include keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Keywords marking a listing as tracked
    #[serde(default = "defaults::include_keywords")]
    pub include: Vec<String>,

    /// Keywords suppressing a listing even when an include keyword matches
    #[serde(default = "defaults::exclude_keywords")]
    pub exclude: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            include: defaults::include_keywords(),
            exclude: defaults::exclude_keywords(),
        }
    }
}

/// Notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Maximum number of per-listing detail messages per cycle
    #[serde(default = "defaults::max_details")]
    pub max_details: usize,

    /// Send an acknowledgment message when the baseline is established
    #[serde(default)]
    pub announce_baseline: bool,

    /// Template for the per-cycle summary message ({count} placeholder)
    #[serde(default = "defaults::summary_template")]
    pub summary_template: String,

    /// Template for per-listing detail messages (see Listing::format)
    #[serde(default = "defaults::detail_template")]
    pub detail_template: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_details: defaults::max_details(),
            announce_baseline: false,
            summary_template: defaults::summary_template(),
            detail_template: defaults::detail_template(),
        }
    }
}

/// Persisted state settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path of the seen-snapshot file
    #[serde(default = "defaults::state_path")]
    pub path: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: defaults::state_path(),
        }
    }
}

/// Runtime credentials and source location, read from the environment once
/// at startup and passed into the services that need them.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Telegram bot token
    pub bot_token: String,

    /// Telegram chat identifier messages are delivered to
    pub chat_id: String,

    /// URL of the listing source document
    pub source_url: String,

    /// Optional bearer token for the source host
    pub source_token: Option<String>,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// A missing required variable is a fatal startup condition.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bot_token: require_var("TELEGRAM_BOT_TOKEN")?,
            chat_id: require_var("TELEGRAM_CHAT_ID")?,
            source_url: require_var("SOURCE_URL")?,
            source_token: optional_var("SOURCE_TOKEN"),
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!(
            "Missing required environment variable {name}"
        ))),
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

mod defaults {
    // Watcher defaults
    pub fn user_agent() -> String {
        "internwatch/0.1".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn poll_interval() -> u64 {
        900
    }

    // Source defaults
    pub fn section_heading() -> String {
        "## Software Engineering Internship Roles".into()
    }

    // Filter defaults
    pub fn include_keywords() -> Vec<String> {
        vec![
            "software".into(),
            "swe".into(),
            "developer".into(),
            "engineer".into(),
            "engineering".into(),
            "backend".into(),
            "frontend".into(),
            "full stack".into(),
            "full-stack".into(),
            "mobile".into(),
            "devops".into(),
            "infrastructure".into(),
        ]
    }
    pub fn exclude_keywords() -> Vec<String> {
        vec![
            "data".into(),
            "analyst".into(),
            "analytics".into(),
            "hardware".into(),
            "electrical".into(),
            "mechanical".into(),
            "civil".into(),
            "quant".into(),
            "finance".into(),
            "accounting".into(),
            "marketing".into(),
            "sales".into(),
            "supply chain".into(),
        ]
    }

    // Notify defaults
    pub fn max_details() -> usize {
        5
    }
    pub fn summary_template() -> String {
        "🚨 {count} new internship listing(s) added!".into()
    }
    pub fn detail_template() -> String {
        "🚨 New internship\n{company}: {title}\n{location}\n{url}".into()
    }

    // State defaults
    pub fn state_path() -> String {
        "seen_listings.json".into()
    }
}
