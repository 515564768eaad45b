//! WhatsApp channel: send text messages via the Cloud API messages endpoint.

use crate::channels::sender::{ReplySender, SendError};
use async_trait::async_trait;
use std::time::Duration;

/// Cloud API limit for a text message body, in characters.
const MAX_TEXT_CHARS: usize = 4096;

/// WhatsApp Cloud API sender. The endpoint and token come from deployment config.
pub struct WhatsAppChannel {
    id: String,
    endpoint: Option<String>,
    token: Option<String>,
    client: reqwest::Client,
}

impl WhatsAppChannel {
    pub fn new(endpoint: Option<String>, token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("whatsapp: http client with timeout unavailable ({}), using default", e);
                reqwest::Client::new()
            });
        Self {
            id: "whatsapp".to_string(),
            endpoint,
            token,
            client,
        }
    }

    /// POST a text message to the messages endpoint.
    pub async fn send_message(&self, to: &str, text: &str) -> Result<(), SendError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(SendError::NotConfigured("endpoint"))?;
        let token = self
            .token
            .as_ref()
            .ok_or(SendError::NotConfigured("credential"))?;
        let body = serde_json::json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "preview_url": false, "body": truncate_chars(text, MAX_TEXT_CHARS) },
        });
        let res = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SendError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl ReplySender for WhatsAppChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError> {
        self.send_message(recipient, text).await
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("⚠ab", 2), "⚠a");
        assert_eq!(truncate_chars("", 0), "");
    }

    #[tokio::test]
    async fn unconfigured_send_fails_without_network() {
        let ch = WhatsAppChannel::new(None, Some("t".to_string()), Duration::from_secs(1));
        let err = ch.send_text("1555", "hi").await.expect_err("not configured");
        assert!(matches!(err, SendError::NotConfigured("endpoint")));
    }
}
