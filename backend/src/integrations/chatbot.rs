use serde_json::Value;

use speakerdrive_shared::ChatbotResponse;

use super::{IntegrationError, IntegrationResult};
use crate::config::ChatbotConfig;

pub const SERVICE: &str = "chatbot";

/// Chat webhook client. The message travels as a query parameter and the
/// webhook authenticates with `Username`/`Password` headers.
pub struct ChatbotClient {
    client: reqwest::Client,
    config: ChatbotConfig,
}

impl ChatbotClient {
    pub fn new(config: &ChatbotConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: config.clone(),
        }
    }

    pub async fn send_message(&self, message: &str) -> IntegrationResult<ChatbotResponse> {
        let webhook_url = self
            .config
            .webhook_url
            .as_deref()
            .ok_or(IntegrationError::NotConfigured(SERVICE))?;

        let response = self
            .client
            .post(webhook_url)
            .query(&[("message", message)])
            .header("Username", &self.config.username)
            .header("Password", &self.config.password)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|source| IntegrationError::Request { service: SERVICE, source })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| IntegrationError::Request { service: SERVICE, source })?;

        if !status.is_success() {
            return Err(IntegrationError::Upstream {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        Ok(ChatbotResponse {
            response: reply_text(&body),
            status: status.as_u16(),
        })
    }
}

/// The webhook answers `{"response": "..."}`; anything else is passed through as text.
fn reply_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("response") {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Ok(Value::String(text)) => text,
        _ => body.to_string(),
    }
}
