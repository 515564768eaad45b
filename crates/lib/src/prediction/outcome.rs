//! Backend reply classification.
//!
//! Shapes are tried in a fixed order, first match wins:
//! `error` (any non-empty value), `results` (array), `responses` (array), `reply` (string).
//! Anything else is kept as [`PredictionOutcome::Unrecognized`].

use serde::Serialize;
use serde_json::Value;

/// Doctor shown when a result names none (matches the backend's own fallback).
pub const DEFAULT_DOCTOR: &str = "General Physician";

/// Shown when the backend reports an error we cannot put into words, or a response element has
/// no recognizable shape.
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "Unexpected response format.";

/// Where an error outcome came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The backend answered with an `error` field.
    Backend,
    /// The backend could not be reached or its body was not JSON.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorOutcome {
    pub message: String,
    pub kind: ErrorKind,
}

impl ErrorOutcome {
    pub fn backend(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Backend,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ErrorKind::Transport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub disease: String,
    /// Percentage, 0–100.
    pub confidence: f64,
    pub doctor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleResultOutcome {
    pub results: Vec<PredictionResult>,
}

/// One element of a multi-result reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SubOutcome {
    Error(ErrorOutcome),
    Results(SingleResultOutcome),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PredictionOutcome {
    Error(ErrorOutcome),
    Single(SingleResultOutcome),
    Multi { responses: Vec<SubOutcome> },
    PlainReply { text: String },
    Unrecognized { raw: Value },
}

impl PredictionOutcome {
    /// True when the backend was never reached or answered garbage.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            PredictionOutcome::Error(ErrorOutcome {
                kind: ErrorKind::Transport,
                ..
            })
        )
    }
}

/// Classify a backend JSON body.
pub fn normalize(body: Value) -> PredictionOutcome {
    if let Some(message) = error_message(&body) {
        return PredictionOutcome::Error(ErrorOutcome::backend(message));
    }
    if let Some(results) = body.get("results").and_then(Value::as_array) {
        return PredictionOutcome::Single(parse_results(results));
    }
    if let Some(responses) = body.get("responses").and_then(Value::as_array) {
        let responses = responses.iter().map(classify_sub).collect();
        return PredictionOutcome::Multi { responses };
    }
    if let Some(reply) = body.get("reply").and_then(Value::as_str) {
        return PredictionOutcome::PlainReply {
            text: reply.to_string(),
        };
    }
    PredictionOutcome::Unrecognized { raw: body }
}

/// An element of `responses` must carry its own `error` or `results`.
fn classify_sub(item: &Value) -> SubOutcome {
    if let Some(message) = error_message(item) {
        return SubOutcome::Error(ErrorOutcome::backend(message));
    }
    match item.get("results").and_then(Value::as_array) {
        Some(results) => SubOutcome::Results(parse_results(results)),
        None => {
            log::warn!("backend: response element without error or results: {}", item);
            SubOutcome::Error(ErrorOutcome::backend(UNEXPECTED_FORMAT_MESSAGE))
        }
    }
}

/// `None` when `error` is absent or empty (`null`, `false`, `0`, blank string, `{}`, `[]`).
/// A non-string error is logged and replaced by a generic message.
fn error_message(v: &Value) -> Option<String> {
    let error = v.get("error")?;
    match error {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => {
            log::warn!("backend: non-text error field: {}", other);
            Some(UNEXPECTED_FORMAT_MESSAGE.to_string())
        }
    }
}

/// Entries whose disease is missing or whose confidence does not parse are dropped.
fn parse_results(items: &[Value]) -> SingleResultOutcome {
    let results = items
        .iter()
        .filter_map(|item| {
            let parsed = parse_result(item);
            if parsed.is_none() {
                log::warn!("backend: dropping unparseable result entry: {}", item);
            }
            parsed
        })
        .collect();
    SingleResultOutcome { results }
}

fn parse_result(item: &Value) -> Option<PredictionResult> {
    let disease = item
        .get("disease")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?;
    let confidence = item.get("confidence").and_then(coerce_confidence)?;
    let doctor = item
        .get("doctor")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DOCTOR);
    Some(PredictionResult {
        disease: disease.to_string(),
        confidence,
        doctor: doctor.to_string(),
    })
}

/// Number, or a numeric string such as `"87.5"` or `"87.5%"`.
fn coerce_confidence(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
