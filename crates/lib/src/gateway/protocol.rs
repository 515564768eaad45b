//! Gateway HTTP wire types.

use serde::{Deserialize, Serialize};

/// `POST /query` body: `{ "symptoms": ["itching", "skin_rash"], "speech": true }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Set by clients that read replies aloud.
    #[serde(default)]
    pub speech: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_default_when_absent() {
        let q: QueryRequest = serde_json::from_str("{}").expect("parse");
        assert!(q.symptoms.is_empty());
        assert!(!q.speech);
    }
}
