//! Cura relay library: WhatsApp webhook handling, prediction-backend client, reply rendering,
//! and the HTTP gateway used by the CLI.

pub mod channels;
pub mod config;
pub mod gateway;
pub mod init;
pub mod prediction;
pub mod relay;
pub mod reply;
