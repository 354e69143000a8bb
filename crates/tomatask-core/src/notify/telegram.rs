//! Telegram Bot API transport.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::error::NotifyError;
use crate::storage::TelegramConfig;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Bot account returned by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotIdentity {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    /// Build a notifier from configuration. The bot token is required; the
    /// chat id is only checked when sending.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, NotifyError> {
        if config.bot_token.trim().is_empty() {
            return Err(NotifyError::NotConfigured("telegram.bot_token"));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.trim().to_string(),
            chat_id: config.chat_id.trim().to_string(),
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, NotifyError> {
        Ok(Url::parse(&format!(
            "{}/bot{}/{method}",
            self.api_base, self.bot_token
        ))?)
    }

    /// Post an HTML message to the configured chat.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        if self.chat_id.is_empty() {
            return Err(NotifyError::NotConfigured("telegram.chat_id"));
        }
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let resp = self
            .client
            .post(self.method_url("sendMessage")?)
            .json(&body)
            .send()
            .await?;

        if resp.status().is_success() {
            tracing::debug!("telegram message sent");
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(NotifyError::Status { status, body })
        }
    }

    /// Verify the bot token with `getMe`.
    pub async fn check_connection(&self) -> Result<BotIdentity, NotifyError> {
        let resp = self.client.get(self.method_url("getMe")?).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        let parsed: ApiResponse<BotIdentity> = resp.json().await?;
        match parsed {
            ApiResponse {
                ok: true,
                result: Some(bot),
                ..
            } => Ok(bot),
            other => Err(NotifyError::Status {
                status,
                body: other
                    .description
                    .unwrap_or_else(|| "unexpected getMe response".into()),
            }),
        }
    }
}
