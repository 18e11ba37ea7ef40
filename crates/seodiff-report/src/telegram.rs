//! Telegram Bot API notifier.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use seodiff_core::AppConfig;

use crate::error::{truncate_body, ReportError};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org/";

/// Outcome of [`TelegramNotifier::send_html`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    /// Token or chat id not configured; nothing was sent.
    Disabled,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

struct Target {
    bot_token: String,
    chat_id: String,
}

/// Posts HTML messages to one chat.
///
/// Without both a bot token and a chat id the notifier is disabled: sends
/// log a warning and return [`Delivery::Disabled`].
pub struct TelegramNotifier {
    client: Client,
    target: Option<Target>,
    base_url: Url,
}

impl TelegramNotifier {
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        bot_token: Option<&str>,
        chat_id: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ReportError> {
        Self::with_base_url(bot_token, chat_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReportError> {
        Self::new(
            config.telegram_bot_token.as_deref(),
            config.telegram_chat_id.as_deref(),
            config.request_timeout_secs,
        )
    }

    /// Creates a notifier with a custom API base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ReportError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        bot_token: Option<&str>,
        chat_id: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ReportError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let target = match (bot_token, chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(Target {
                bot_token: bot_token.to_owned(),
                chat_id: chat_id.to_owned(),
            }),
            _ => None,
        };

        Ok(Self {
            client,
            target,
            base_url,
        })
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Sends `text` with `parse_mode=HTML` and link previews off.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Http`] on network failure.
    /// - [`ReportError::UnexpectedStatus`] on any non-2xx response.
    /// - [`ReportError::Api`] if Telegram answers `"ok": false`.
    pub async fn send_html(&self, text: &str) -> Result<Delivery, ReportError> {
        let Some(target) = &self.target else {
            tracing::warn!("Telegram disabled (TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set)");
            return Ok(Delivery::Disabled);
        };

        let url = self
            .base_url
            // Leading "./" keeps a "123:abc" token from parsing as a URL scheme.
            .join(&format!("./bot{}/sendMessage", target.bot_token))
            .map_err(|e| ReportError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let body = serde_json::json!({
            "chat_id": target.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let response = self.client.post(url).json(&body).send().await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ReportError::UnexpectedStatus {
                service: "Telegram",
                status: status.as_u16(),
                body: truncate_body(&raw),
            });
        }

        let parsed: ApiResponse = serde_json::from_str(&raw)?;
        if !parsed.ok {
            return Err(ReportError::Api {
                service: "Telegram",
                message: parsed
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        tracing::info!(chat_id = %target.chat_id, "Telegram report sent");
        Ok(Delivery::Sent)
    }
}
