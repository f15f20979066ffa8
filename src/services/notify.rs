// src/services/notify.rs

//! Telegram notification dispatch.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Credentials, WatcherConfig};

/// Telegram Bot API host.
const TELEGRAM_API: &str = "https://api.telegram.org";

/// Trait for outbound notification channels.
///
/// Failures are propagated, not swallowed; a lost notification should be
/// visible to the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one human-readable text message.
    async fn send(&self, text: &str) -> Result<()>;
}

/// Notifier delivering messages through the Telegram Bot API.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Create a notifier with a configured HTTP client.
    pub fn new(config: &WatcherConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            token: credentials.bot_token.clone(),
            chat_id: credentials.chat_id.clone(),
        })
    }

    /// Build the sendMessage endpoint with the message as query parameters.
    fn endpoint(&self, text: &str) -> Result<Url> {
        let base = format!("{}/bot{}/sendMessage", TELEGRAM_API, self.token);
        let url = Url::parse_with_params(
            &base,
            &[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("disable_web_page_preview", "true"),
            ],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let url = self.endpoint(text)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notify(status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WatcherConfig;

    fn notifier() -> TelegramNotifier {
        let credentials = Credentials {
            bot_token: "123:abc".to_string(),
            chat_id: "-100200300".to_string(),
            source_url: "https://example.com/feed.json".to_string(),
            source_token: None,
        };
        TelegramNotifier::new(&WatcherConfig::default(), &credentials).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_message() {
        let url = notifier().endpoint("new listing: a & b").unwrap();

        assert_eq!(url.host_str(), Some("api.telegram.org"));
        assert_eq!(url.path(), "/bot123:abc/sendMessage");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("chat_id".to_string(), "-100200300".to_string())));
        assert!(pairs.contains(&("text".to_string(), "new listing: a & b".to_string())));
        assert!(pairs.contains(&(
            "disable_web_page_preview".to_string(),
            "true".to_string()
        )));
    }
}
