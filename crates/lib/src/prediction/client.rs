//! HTTP client for the prediction backend (`POST /chat`).
//!
//! Transport faults never reach callers: they come back as a transport [`ErrorOutcome`].

use crate::prediction::outcome::{normalize, ErrorOutcome, PredictionOutcome};
use crate::prediction::query::Query;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const CONNECT_ERROR_MESSAGE: &str = "Error connecting to server.";
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server.";

#[derive(Debug, thiserror::Error)]
enum BackendError {
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend api error: {0}")]
    Api(String),
    #[error("backend returned invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    fn into_outcome(self) -> PredictionOutcome {
        let message = match self {
            BackendError::Decode(_) => INVALID_RESPONSE_MESSAGE,
            BackendError::Request(_) | BackendError::Api(_) => CONNECT_ERROR_MESSAGE,
        };
        PredictionOutcome::Error(ErrorOutcome::transport(message))
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    message: &'a Query,
}

/// Client for the prediction backend. Cheap to clone; safe to share across tasks.
#[derive(Clone)]
pub struct PredictionClient {
    client: reqwest::Client,
}

impl PredictionClient {
    /// Every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("backend: http client with timeout unavailable ({}), using default", e);
                reqwest::Client::new()
            });
        Self { client }
    }

    /// POST the query to `endpoint` and classify the reply.
    pub async fn query(&self, endpoint: &str, query: &Query) -> PredictionOutcome {
        match self.post(endpoint, query).await {
            Ok(body) => normalize(body),
            Err(e) => {
                match &e {
                    BackendError::Request(re) if re.is_timeout() => {
                        log::warn!("backend: request to {} timed out", endpoint)
                    }
                    _ => log::warn!("backend: {}", e),
                }
                e.into_outcome()
            }
        }
    }

    /// Non-2xx answers that still carry JSON (e.g. `400 {"error": ...}`) are returned as bodies.
    async fn post(&self, endpoint: &str, query: &Query) -> Result<Value, BackendError> {
        let res = self
            .client
            .post(endpoint)
            .json(&QueryRequest { message: query })
            .send()
            .await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => {
                if !status.is_success() {
                    log::debug!("backend: {} with JSON body, classifying as reply", status);
                }
                Ok(body)
            }
            Err(e) if status.is_success() => Err(BackendError::Decode(e)),
            Err(_) => Err(BackendError::Api(format!(
                "{} {}",
                status,
                String::from_utf8_lossy(&bytes)
            ))),
        }
    }
}
