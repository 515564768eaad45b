//! Reply rendering and dispatch.

mod dispatch;
mod render;

pub use dispatch::{for_display, Destination, Dispatched, ReplyDispatcher};
pub use render::{render, RenderableReply, NO_PREDICTIONS_MESSAGE, RESULTS_HEADER, WARNING_MARKER};
