//! Render a [`PredictionOutcome`] into display lines.

use crate::prediction::{
    ErrorOutcome, PredictionOutcome, SingleResultOutcome, SubOutcome, UNEXPECTED_FORMAT_MESSAGE,
};
use serde::Serialize;

pub const WARNING_MARKER: &str = "⚠ ";
pub const RESULTS_HEADER: &str = "Top predictions:";
pub const NO_PREDICTIONS_MESSAGE: &str = "No predictions returned.";

/// Display-ready reply, built fresh for each request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableReply {
    pub lines: Vec<String>,
    pub is_error: bool,
}

impl RenderableReply {
    /// Single warning line.
    pub fn warning(message: &str) -> Self {
        Self {
            lines: vec![format!("{}{}", WARNING_MARKER, message)],
            is_error: true,
        }
    }

    /// Lines joined for a single text message.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn render(outcome: &PredictionOutcome) -> RenderableReply {
    match outcome {
        PredictionOutcome::Error(e) => render_error(e),
        PredictionOutcome::Single(s) => render_results(s),
        PredictionOutcome::Multi { responses } => render_multi(responses),
        PredictionOutcome::PlainReply { text } => RenderableReply {
            lines: vec![text.clone()],
            is_error: false,
        },
        PredictionOutcome::Unrecognized { raw } => {
            log::warn!("backend: unexpected response format: {}", raw);
            RenderableReply::warning(UNEXPECTED_FORMAT_MESSAGE)
        }
    }
}

fn render_error(e: &ErrorOutcome) -> RenderableReply {
    RenderableReply::warning(&e.message)
}

fn render_results(s: &SingleResultOutcome) -> RenderableReply {
    let mut lines = Vec::with_capacity(s.results.len() + 1);
    lines.push(RESULTS_HEADER.to_string());
    lines.extend(
        s.results
            .iter()
            .map(|r| format!("{} — {:.2}% ({})", r.disease, r.confidence, r.doctor)),
    );
    RenderableReply {
        lines,
        is_error: false,
    }
}

/// Blocks in order, separated by a blank line. An error only when every block is one.
fn render_multi(responses: &[SubOutcome]) -> RenderableReply {
    if responses.is_empty() {
        return RenderableReply::warning(NO_PREDICTIONS_MESSAGE);
    }
    let mut lines = Vec::new();
    let mut all_errors = true;
    for (i, sub) in responses.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let block = match sub {
            SubOutcome::Error(e) => render_error(e),
            SubOutcome::Results(s) => render_results(s),
        };
        all_errors &= block.is_error;
        lines.extend(block.lines);
    }
    RenderableReply {
        lines,
        is_error: all_errors,
    }
}
