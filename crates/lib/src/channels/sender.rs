//! Outbound send capability: deliver one text message to a platform recipient.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("platform send not configured: {0}")]
    NotConfigured(&'static str),
    #[error("platform request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("platform api error: {0}")]
    Api(String),
}

/// Sends a text message to a recipient on the messaging platform.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Channel id (e.g. "whatsapp"), used in logs.
    fn id(&self) -> &str;

    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError>;
}
