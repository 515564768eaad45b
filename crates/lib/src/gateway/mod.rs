//! Gateway: HTTP front end for the relay.
//!
//! Single port serves the WhatsApp webhook, the direct-query endpoint used by the chat page,
//! and a health probe.

mod protocol;
mod server;

pub use protocol::QueryRequest;
pub use server::run_gateway;
