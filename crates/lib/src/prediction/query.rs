//! Query sent to the backend: free text from a platform message, or a symptom selection.

use serde::Serialize;

/// Local validation failures. Their messages are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Please select at least one symptom.")]
    EmptySelection,
    #[error("Please describe your symptoms in a text message.")]
    MissingText,
}

/// Serializes as a bare string or array so it can sit directly under the `message` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Query {
    Text(String),
    SelectionSet(Vec<String>),
}

impl Query {
    pub fn text(text: &str) -> Result<Self, QueryError> {
        let t = text.trim();
        if t.is_empty() {
            return Err(QueryError::MissingText);
        }
        Ok(Query::Text(t.to_string()))
    }

    /// Blank identifiers are dropped; order is kept.
    pub fn selection<I, S>(items: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items: Vec<String> = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() {
            return Err(QueryError::EmptySelection);
        }
        Ok(Query::SelectionSet(items))
    }

    /// What the user asked, in readable form: the text itself, or the selection with
    /// underscores spaced out (`["skin_rash", "itching"]` → `"skin rash, itching"`).
    pub fn describe(&self) -> String {
        match self {
            Query::Text(t) => t.clone(),
            Query::SelectionSet(items) => items
                .iter()
                .map(|s| s.replace('_', " "))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_under_one_field() {
        let text = Query::text("  itching ").expect("text");
        let sel = Query::selection(["itching", "skin_rash"]).expect("selection");
        assert_eq!(
            serde_json::to_value(json!({ "message": text })).expect("json"),
            json!({ "message": "itching" })
        );
        assert_eq!(
            serde_json::to_value(json!({ "message": sel })).expect("json"),
            json!({ "message": ["itching", "skin_rash"] })
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(Query::text("   "), Err(QueryError::MissingText));
        assert_eq!(
            Query::selection(Vec::<String>::new()),
            Err(QueryError::EmptySelection)
        );
        assert_eq!(Query::selection(["", " "]), Err(QueryError::EmptySelection));
    }

    #[test]
    fn describes_what_was_asked() {
        let sel = Query::selection(["skin_rash", " ", "itching"]).expect("selection");
        assert_eq!(sel.describe(), "skin rash, itching");
        let text = Query::text(" my_skin itches ").expect("text");
        assert_eq!(text.describe(), "my_skin itches");
    }
}
