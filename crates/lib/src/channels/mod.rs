//! Messaging-platform channel (WhatsApp Cloud API).
//!
//! Inbound: webhook envelopes are decoded and reduced to an [`ExtractedMessage`].
//! Outbound: replies go through the [`ReplySender`] capability.

mod envelope;
mod inbound;
mod sender;
mod whatsapp;

pub use envelope::{extract, Change, ChangeValue, Entry, InboundEnvelope, TextBody, WhatsAppMessage};
pub use inbound::ExtractedMessage;
pub use sender::{ReplySender, SendError};
pub use whatsapp::WhatsAppChannel;
