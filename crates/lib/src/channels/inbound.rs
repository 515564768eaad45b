//! Inbound message from the platform: the part of a webhook delivery the relay acts on.

/// Sender and text of one inbound platform message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    pub origin_id: String,
    /// Message body; empty when the message type carries no text (image, location, ...).
    pub text: String,
}
