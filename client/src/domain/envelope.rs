//! Response envelope shared by every marketplace endpoint.
//!
//! The API wraps every body in `{ success, data?, message? }` and keeps the
//! HTTP status and the envelope verdict independent: a 200 reply may still
//! decline the request through `success: false`.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::ports::ApiError;

/// Decoded `{ success, data?, message? }` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the server accepted the request.
    pub success: bool,
    /// Payload, present on acceptance. Missing keys decode as `None`, so
    /// no `Default` bound leaks onto the payload type.
    pub data: Option<T>,
    /// Server-authored explanation, usually accompanying a refusal.
    pub message: Option<String>,
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Decode a reply body into the envelope.
    ///
    /// An empty (`null`) reply decodes as an accepted envelope with no
    /// payload; some mutation endpoints answer with an empty body.
    pub fn decode(value: Value) -> Result<Self, ApiError> {
        if value.is_null() {
            return Ok(Self {
                success: true,
                data: None,
                message: None,
            });
        }
        serde_json::from_value(value)
            .map_err(|error| ApiError::decode(format!("invalid response envelope: {error}")))
    }

    /// Accept the envelope, yielding its optional payload.
    ///
    /// A declined envelope maps to [`ApiError::Rejected`] carrying the
    /// server message verbatim.
    pub fn accept(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::rejected(
                self.message
                    .unwrap_or_else(|| "requête refusée par le serveur".to_owned()),
            ))
        }
    }

    /// Accept the envelope and require a payload.
    pub fn require_data(self) -> Result<T, ApiError> {
        self.accept()?
            .ok_or_else(|| ApiError::decode("response envelope carried no data payload"))
    }
}

/// Decode a list reply.
///
/// A declined envelope is not an error here: list screens render an empty
/// collection plus the server message rather than failing outright, so the
/// refusal comes back as `(empty, Some(message))`.
pub fn decode_list<T: DeserializeOwned>(
    value: Value,
) -> Result<(Vec<T>, Option<String>), ApiError> {
    let envelope = ApiEnvelope::<Vec<T>>::decode(value)?;
    if envelope.success {
        Ok((envelope.data.unwrap_or_default(), None))
    } else {
        let message = envelope
            .message
            .unwrap_or_else(|| "liste indisponible".to_owned());
        Ok((Vec::new(), Some(message)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use serde_json::{Value, json};

    use super::{ApiEnvelope, decode_list};
    use crate::domain::ports::ApiError;

    #[test]
    fn accepted_envelopes_yield_their_payload() {
        let envelope = ApiEnvelope::<Vec<String>>::decode(json!({
            "success": true,
            "data": ["a", "b"]
        }))
        .expect("well-formed envelope should decode");
        assert_eq!(
            envelope.require_data().expect("payload present"),
            vec!["a".to_owned(), "b".to_owned()]
        );
    }

    #[test]
    fn declined_envelopes_surface_the_server_message_verbatim() {
        let envelope = ApiEnvelope::<Value>::decode(json!({
            "success": false,
            "message": "Facture introuvable"
        }))
        .expect("well-formed envelope should decode");
        let error = envelope.accept().expect_err("refusal must not be silent");
        assert_eq!(error, ApiError::rejected("Facture introuvable"));
    }

    #[test]
    fn empty_replies_decode_as_accepted_and_empty() {
        let envelope =
            ApiEnvelope::<Value>::decode(Value::Null).expect("empty reply should decode");
        assert!(envelope.success);
        assert_eq!(envelope.accept().expect("accepted"), None);
    }

    #[test]
    fn non_envelope_bodies_are_decode_errors() {
        let error = ApiEnvelope::<Value>::decode(json!(["not", "an", "envelope"]))
            .expect_err("array body is not an envelope");
        assert!(matches!(error, ApiError::Decode { .. }));
    }

    #[test]
    fn payload_types_need_no_default_implementation() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Receipt {
            id_facture: String,
        }

        let envelope = ApiEnvelope::<Receipt>::decode(json!({
            "success": true,
            "data": { "id_facture": "F1" }
        }))
        .expect("envelope with payload should decode");
        assert_eq!(
            envelope.require_data().expect("payload present").id_facture,
            "F1"
        );

        let bare = ApiEnvelope::<Receipt>::decode(json!({ "success": true }))
            .expect("envelope without data or message keys should decode");
        assert_eq!(bare.accept().expect("accepted"), None);
    }

    #[test]
    fn declined_lists_come_back_empty_with_the_message() {
        let (items, message) = decode_list::<Value>(json!({
            "success": false,
            "message": "Aucune école correspondante"
        }))
        .expect("declined lists are not errors");
        assert!(items.is_empty());
        assert_eq!(message.as_deref(), Some("Aucune école correspondante"));
    }

    #[test]
    fn accepted_lists_tolerate_missing_data() {
        let (items, message) =
            decode_list::<Value>(json!({ "success": true })).expect("missing data tolerated");
        assert!(items.is_empty());
        assert_eq!(message, None);
    }
}
