//! Deliver a rendered reply: send it to a platform recipient, or hand it back for display.

use crate::channels::ReplySender;
use crate::reply::render::RenderableReply;
use std::sync::Arc;

/// Where a reply goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Platform message to the sender of the inbound message.
    Send { recipient: String },
    /// Chat surface of the caller. `speech` is true when the caller can read replies aloud.
    Render { speech: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Sent,
    /// Logged; sends are best-effort and never retried.
    SendFailed,
    Rendered {
        reply: RenderableReply,
        speech: Option<String>,
    },
}

pub struct ReplyDispatcher {
    sender: Arc<dyn ReplySender>,
}

impl ReplyDispatcher {
    pub fn new(sender: Arc<dyn ReplySender>) -> Self {
        Self { sender }
    }

    pub async fn dispatch(&self, reply: RenderableReply, destination: Destination) -> Dispatched {
        match destination {
            Destination::Send { recipient } => {
                let text = reply.text();
                match self.sender.send_text(&recipient, &text).await {
                    Ok(()) => {
                        log::debug!("{}: reply sent to {}", self.sender.id(), recipient);
                        Dispatched::Sent
                    }
                    Err(e) => {
                        log::warn!("{}: send to {} failed: {}", self.sender.id(), recipient, e);
                        Dispatched::SendFailed
                    }
                }
            }
            Destination::Render { speech } => {
                let (reply, speech) = for_display(reply, speech);
                Dispatched::Rendered { reply, speech }
            }
        }
    }
}

/// Reply for a chat surface, with the text to read aloud when `speech` is set.
pub fn for_display(reply: RenderableReply, speech: bool) -> (RenderableReply, Option<String>) {
    let speech = speech.then(|| reply.text());
    (reply, speech)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::SendError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        fail: bool,
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        fn id(&self) -> &str {
            "test"
        }

        async fn send_text(&self, recipient: &str, text: &str) -> Result<(), SendError> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient.to_string(), text.to_string()));
            if self.fail {
                Err(SendError::Api("500 boom".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn reply() -> RenderableReply {
        RenderableReply {
            lines: vec![
                "Top predictions:".to_string(),
                "Flu — 50.00% (GP)".to_string(),
            ],
            is_error: false,
        }
    }

    #[tokio::test]
    async fn send_joins_lines_into_one_message() {
        let sender = Arc::new(RecordingSender::default());
        let d = ReplyDispatcher::new(sender.clone());
        let out = d
            .dispatch(reply(), Destination::Send { recipient: "1555".to_string() })
            .await;
        assert_eq!(out, Dispatched::Sent);
        assert_eq!(
            *sender.sent.lock().unwrap(),
            vec![(
                "1555".to_string(),
                "Top predictions:\nFlu — 50.00% (GP)".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn send_failure_is_reported_once() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..Default::default()
        });
        let d = ReplyDispatcher::new(sender.clone());
        let out = d
            .dispatch(reply(), Destination::Send { recipient: "1555".to_string() })
            .await;
        assert_eq!(out, Dispatched::SendFailed);
        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn render_returns_reply_and_optional_speech() {
        let sender = Arc::new(RecordingSender::default());
        let d = ReplyDispatcher::new(sender.clone());
        let spoken = d.dispatch(reply(), Destination::Render { speech: true }).await;
        assert_eq!(
            spoken,
            Dispatched::Rendered {
                reply: reply(),
                speech: Some("Top predictions:\nFlu — 50.00% (GP)".to_string()),
            }
        );
        let silent = d.dispatch(reply(), Destination::Render { speech: false }).await;
        assert_eq!(
            silent,
            Dispatched::Rendered {
                reply: reply(),
                speech: None,
            }
        );
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
