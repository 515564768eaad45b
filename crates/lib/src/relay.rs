//! Relay orchestrator: one pipeline behind both entry points.
//!
//! Webhook: envelope → extract → query backend → render → send to the platform sender.
//! Direct query: selection → query backend → render → hand back to the calling surface.
//! Nothing here is shared between requests except the HTTP clients.

use crate::channels::{extract, InboundEnvelope, ReplySender, WhatsAppChannel};
use crate::config::RelaySettings;
use crate::prediction::{PredictionClient, Query, QueryError};
use crate::reply::{
    for_display, render, Destination, Dispatched, RenderableReply, ReplyDispatcher,
};
use serde::Serialize;
use std::sync::Arc;

/// Webhook faults that cannot be expressed as a reply to the user.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("malformed webhook envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),
}

/// How a webhook delivery ended. Every variant is acknowledged to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// No actionable message (status update, empty change set).
    Ignored,
    /// Message had no text; the sender was told so and the backend was not queried.
    Warned(Dispatched),
    /// Backend unreachable or timed out; nothing was sent.
    BackendUnavailable,
    Replied(Dispatched),
}

/// Reply to a direct query, for a chat surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectReply {
    /// The user's selection in readable form, shown as their own message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub echo: Option<String>,
    #[serde(flatten)]
    pub reply: RenderableReply,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
}

impl DirectReply {
    /// Warning for a query rejected before any network call.
    pub fn rejected(err: &QueryError) -> Self {
        Self {
            echo: None,
            reply: RenderableReply::warning(&err.to_string()),
            speech: None,
        }
    }
}

pub struct Relay {
    backend_url: String,
    backend: PredictionClient,
    dispatcher: ReplyDispatcher,
}

impl Relay {
    pub fn new(
        backend_url: impl Into<String>,
        backend: PredictionClient,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        Self {
            backend_url: backend_url.into(),
            backend,
            dispatcher: ReplyDispatcher::new(sender),
        }
    }

    /// Relay wired to the WhatsApp Cloud API and the configured backend.
    pub fn from_settings(settings: &RelaySettings) -> Self {
        let channel = WhatsAppChannel::new(
            settings.platform_endpoint.clone(),
            settings.platform_credential.clone(),
            settings.platform_timeout,
        );
        Self::new(
            settings.backend_url.clone(),
            PredictionClient::new(settings.backend_timeout),
            Arc::new(channel),
        )
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Decode a raw webhook body and process it. Only an undecodable body is an error.
    pub async fn handle_webhook(
        &self,
        request_id: &str,
        body: &[u8],
    ) -> Result<WebhookDisposition, RelayError> {
        let envelope = InboundEnvelope::from_slice(body)?;
        Ok(self.handle_envelope(request_id, &envelope).await)
    }

    pub async fn handle_envelope(
        &self,
        request_id: &str,
        envelope: &InboundEnvelope,
    ) -> WebhookDisposition {
        let Some(msg) = extract(envelope) else {
            log::debug!("webhook {}: no actionable message, ignoring", request_id);
            return WebhookDisposition::Ignored;
        };
        log::info!("webhook {}: message from {}", request_id, msg.origin_id);
        let destination = Destination::Send {
            recipient: msg.origin_id,
        };

        let query = match Query::text(&msg.text) {
            Ok(q) => q,
            Err(e) => {
                log::debug!("webhook {}: {}", request_id, e);
                let warning = RenderableReply::warning(&e.to_string());
                let dispatched = self.dispatcher.dispatch(warning, destination).await;
                return WebhookDisposition::Warned(dispatched);
            }
        };

        let outcome = self.backend.query(&self.backend_url, &query).await;
        if outcome.is_transport_error() {
            log::warn!("webhook {}: backend unavailable, no reply sent", request_id);
            return WebhookDisposition::BackendUnavailable;
        }
        let reply = render(&outcome);
        let dispatched = self.dispatcher.dispatch(reply, destination).await;
        log::debug!("webhook {}: {:?}", request_id, dispatched);
        WebhookDisposition::Replied(dispatched)
    }

    /// Query with a symptom selection and return the reply for display.
    /// An empty selection is rejected before any network call.
    pub async fn direct_query<S: AsRef<str>>(
        &self,
        selection: &[S],
        speech: bool,
    ) -> Result<DirectReply, QueryError> {
        let query = Query::selection(selection)?;
        let outcome = self.backend.query(&self.backend_url, &query).await;
        let (reply, speech) = for_display(render(&outcome), speech);
        Ok(DirectReply {
            echo: Some(query.describe()),
            reply,
            speech,
        })
    }
}
