//! Prediction backend: query types, HTTP client, and response normalization.
//!
//! The backend accepts `{ "message": <string | array> }` and answers in one of several JSON
//! shapes; [`normalize`] reduces every shape to a single [`PredictionOutcome`].

mod client;
mod outcome;
mod query;

pub use client::{PredictionClient, CONNECT_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE};
pub use outcome::{
    normalize, ErrorKind, ErrorOutcome, PredictionOutcome, PredictionResult, SingleResultOutcome,
    SubOutcome, DEFAULT_DOCTOR, UNEXPECTED_FORMAT_MESSAGE,
};
pub use query::{Query, QueryError};
