//! WhatsApp Cloud API webhook envelope.
//!
//! Only the path `entry[0].changes[0].value.messages[0]` matters to the relay. Every level is
//! optional, and an explicit `null` (for a level or an array element) counts as missing:
//! subscriptions also deliver status updates (sent/delivered/read) that carry no `messages` and
//! are ignored. A body that is not JSON, or whose fields have the wrong types,
//! fails to decode and is treated as malformed by the caller.

use serde::Deserialize;

use crate::channels::inbound::ExtractedMessage;

/// Webhook POST body.
#[derive(Debug, Default, Deserialize)]
pub struct InboundEnvelope {
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default, rename = "entry")]
    pub entries: Option<Vec<Option<Entry>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub changes: Option<Vec<Option<Change>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub value: Option<ChangeValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Option<Vec<Option<WhatsAppMessage>>>,
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppMessage {
    /// Sender phone number (wa_id).
    pub from: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<TextBody>,
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub body: Option<String>,
}

impl InboundEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    fn first_message(&self) -> Option<&WhatsAppMessage> {
        self.entries
            .as_ref()?
            .first()?
            .as_ref()?
            .changes
            .as_ref()?
            .first()?
            .as_ref()?
            .value
            .as_ref()?
            .messages
            .as_ref()?
            .first()?
            .as_ref()
    }
}

/// Extract the actionable message from an envelope, or `None` when the delivery carries none.
pub fn extract(envelope: &InboundEnvelope) -> Option<ExtractedMessage> {
    let message = envelope.first_message()?;
    let text = message
        .text
        .as_ref()
        .and_then(|t| t.body.clone())
        .unwrap_or_default();
    Some(ExtractedMessage {
        origin_id: message.from.clone(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> InboundEnvelope {
        serde_json::from_value(value).expect("decode envelope")
    }

    #[test]
    fn extracts_text_message() {
        let env = envelope(json!({
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "123",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "messages": [{
                            "from": "15551234567",
                            "id": "wamid.1",
                            "type": "text",
                            "text": { "body": "itching, skin rash" }
                        }]
                    }
                }]
            }]
        }));
        assert_eq!(
            extract(&env),
            Some(ExtractedMessage {
                origin_id: "15551234567".to_string(),
                text: "itching, skin rash".to_string(),
            })
        );
    }

    #[test]
    fn non_text_message_has_empty_text() {
        let env = envelope(json!({
            "entry": [{ "changes": [{ "value": { "messages": [{
                "from": "15550000000",
                "type": "image",
                "image": { "id": "media-1" }
            }] } }] }]
        }));
        let msg = extract(&env).expect("message");
        assert_eq!(msg.origin_id, "15550000000");
        assert_eq!(msg.text, "");
    }

    #[test]
    fn status_update_is_ignored() {
        let env = envelope(json!({
            "entry": [{ "changes": [{ "value": {
                "statuses": [{ "id": "wamid.1", "status": "delivered" }]
            } }] }]
        }));
        assert_eq!(extract(&env), None);
    }

    #[test]
    fn missing_levels_are_ignored() {
        for body in [
            json!({}),
            json!({ "entry": [] }),
            json!({ "entry": [{}] }),
            json!({ "entry": [{ "changes": [] }] }),
            json!({ "entry": [{ "changes": [{}] }] }),
            json!({ "entry": [{ "changes": [{ "value": { "messages": [] } }] }] }),
            json!({ "entry": null }),
            json!({ "entry": [null] }),
            json!({ "entry": [{ "changes": null }] }),
            json!({ "entry": [{ "changes": [null] }] }),
            json!({ "entry": [{ "changes": [{ "value": null }] }] }),
            json!({ "entry": [{ "changes": [{ "value": { "messages": null } }] }] }),
            json!({ "entry": [{ "changes": [{ "value": { "messages": [null] } }] }] }),
        ] {
            assert_eq!(extract(&envelope(body.clone())), None, "body: {}", body);
        }
    }

    #[test]
    fn only_first_message_is_used() {
        let env = envelope(json!({
            "entry": [{ "changes": [{ "value": { "messages": [
                { "from": "a", "type": "text", "text": { "body": "first" } },
                { "from": "b", "type": "text", "text": { "body": "second" } }
            ] } }] }]
        }));
        assert_eq!(extract(&env).map(|m| m.text), Some("first".to_string()));
    }

    #[test]
    fn null_levels_decode_from_raw_bytes() {
        let env = InboundEnvelope::from_slice(br#"{"entry":[{"changes": null}]}"#).expect("decoded");
        assert_eq!(extract(&env), None);
        let env = InboundEnvelope::from_slice(br#"{"entry":[null]}"#).expect("decoded");
        assert_eq!(extract(&env), None);
    }

    #[test]
    fn wrong_types_fail_to_decode() {
        assert!(InboundEnvelope::from_slice(br#"{"entry": "nope"}"#).is_err());
        assert!(InboundEnvelope::from_slice(b"not json").is_err());
    }
}
