use linen_types::Document;
use serde_json::Value;
use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Serialize a document to its persisted JSON form.
pub fn encode_document(document: &Document) -> StoreResult<String> {
    serde_json::to_string(document).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a persisted blob.
///
/// Returns `None` when the blob is not JSON, is not an object, or has no
/// `linens` array. A missing or non-array `transactions` field is treated as
/// an empty ledger.
pub fn decode_document(raw: &str) -> Option<Document> {
    let mut value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "stored document is not valid JSON; ignoring");
            return None;
        }
    };

    let Some(root) = value.as_object_mut() else {
        warn!("stored document is not an object; ignoring");
        return None;
    };

    if !root.get("linens").is_some_and(Value::is_array) {
        warn!("stored document has no linen catalogue; ignoring");
        return None;
    }

    if !root.get("transactions").is_some_and(Value::is_array) {
        root.insert("transactions".into(), Value::Array(Vec::new()));
    }

    match serde_json::from_value(value) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(error = %e, "stored document is malformed; ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linen_types::{LinenType, Movement, Timestamp, Transaction};
    use serde_json::json;

    #[test]
    fn encode_decode_preserves_document() {
        let mut doc = Document::with_linens(vec![LinenType::with_counts("Towels", vec![4], vec![])]);
        doc.transactions.push(Transaction::new(
            "Towels",
            Movement::Delivery,
            4,
            Timestamp::from("2025-01-01T00:00:00.000Z"),
        ));
        let encoded = encode_document(&doc).unwrap();
        assert_eq!(decode_document(&encoded), Some(doc));
    }

    #[test]
    fn invalid_json_is_absent() {
        assert_eq!(decode_document("{not json"), None);
        assert_eq!(decode_document(""), None);
    }

    #[test]
    fn missing_or_wrong_typed_linens_is_absent() {
        assert_eq!(decode_document("[]"), None);
        assert_eq!(decode_document(r#"{"transactions": []}"#), None);
        assert_eq!(decode_document(r#"{"linens": {"name": "Towels"}}"#), None);
        assert_eq!(decode_document(r#"{"linens": null}"#), None);
    }

    #[test]
    fn missing_transactions_default_to_empty() {
        let doc = decode_document(r#"{"linens": [{"name": "Towels", "plus": [1]}]}"#).unwrap();
        assert!(doc.transactions.is_empty());
        assert_eq!(doc.linens[0].plus, vec![1]);

        let doc = decode_document(r#"{"linens": [], "transactions": "nope"}"#).unwrap();
        assert!(doc.transactions.is_empty());
    }

    #[test]
    fn malformed_transaction_is_absent() {
        let raw = json!({
            "linens": [],
            "transactions": [{ "linenName": "Towels" }]
        })
        .to_string();
        assert_eq!(decode_document(&raw), None);
    }
}
