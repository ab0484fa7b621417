use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::error::TypeError;
use crate::temporal::Timestamp;

/// Opaque identifier of a ledger transaction.
///
/// New identifiers are UUID v7 strings. Identifiers found in persisted
/// documents are accepted verbatim, whatever their shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation (first 8 characters).
    pub fn short_id(&self) -> String {
        self.0.chars().take(8).collect()
    }
}

impl From<&str> for TransactionId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({})", self.short_id())
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Direction of a linen movement.
///
/// Persisted as `"add"` / `"remove"`. Any other string decodes as
/// [`Movement::Unrecognized`], which never affects balances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Clean linen delivered (+).
    #[serde(rename = "add")]
    Delivery,
    /// Dirty linen collected (-).
    #[serde(rename = "remove")]
    Collection,
    #[serde(rename = "unknown", other)]
    Unrecognized,
}

impl Movement {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    pub fn sign(&self) -> &'static str {
        match self {
            Self::Delivery => "+",
            Self::Collection => "-",
            Self::Unrecognized => "?",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivery => "Delivery (+)",
            Self::Collection => "Dirty collection (-)",
            Self::Unrecognized => "Unrecognized",
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Delivery => "add",
            Self::Collection => "remove",
            Self::Unrecognized => "unknown",
        }
    }
}

impl FromStr for Movement {
    type Err = TypeError;

    /// Accepts the wire names plus `delivery`/`collection`/`+`/`-`,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "delivery" | "deliver" | "+" => Ok(Self::Delivery),
            "remove" | "collection" | "collect" | "-" => Ok(Self::Collection),
            _ => Err(TypeError::UnrecognizedMovement(s.to_string())),
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// A single movement in the ledger.
///
/// `linen_name` refers to [`crate::LinenType::name`] by value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub linen_name: String,
    pub movement: Movement,
    pub amount: Amount,
    pub timestamp: Timestamp,
}

impl Transaction {
    /// Create a transaction with a freshly generated id.
    pub fn new(
        linen_name: impl Into<String>,
        movement: Movement,
        amount: u64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            linen_name: linen_name.into(),
            movement,
            amount: Amount::from(amount),
            timestamp,
        }
    }

    /// The quantity this transaction contributes to balances, if any.
    pub fn effective_amount(&self) -> Option<u64> {
        if self.movement.is_recognized() {
            self.amount.positive()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn movement_wire_names() {
        assert_eq!(serde_json::to_value(Movement::Delivery).unwrap(), json!("add"));
        assert_eq!(
            serde_json::to_value(Movement::Collection).unwrap(),
            json!("remove")
        );
        let odd: Movement = serde_json::from_value(json!("transfer")).unwrap();
        assert_eq!(odd, Movement::Unrecognized);
    }

    #[test]
    fn movement_parses_user_input() {
        assert_eq!(" ADD ".parse::<Movement>(), Ok(Movement::Delivery));
        assert_eq!("collection".parse::<Movement>(), Ok(Movement::Collection));
        assert_eq!("-".parse::<Movement>(), Ok(Movement::Collection));
        assert!(matches!(
            "sideways".parse::<Movement>(),
            Err(TypeError::UnrecognizedMovement(_))
        ));
    }

    #[test]
    fn transaction_uses_camel_case_fields() {
        let txn = Transaction::new("Towels", Movement::Delivery, 10, Timestamp::from("2025-01-01T00:00:00.000Z"));
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["linenName"], json!("Towels"));
        assert_eq!(value["movement"], json!("add"));
        assert_eq!(value["amount"], json!(10));
        assert_eq!(value["timestamp"], json!("2025-01-01T00:00:00.000Z"));
    }

    #[test]
    fn legacy_transaction_decodes() {
        let txn: Transaction = serde_json::from_value(json!({
            "id": "txn-1700000000000-abc123",
            "linenName": "Towels",
            "movement": "remove",
            "amount": "3",
            "timestamp": "not a date"
        }))
        .unwrap();
        assert_eq!(txn.id.as_str(), "txn-1700000000000-abc123");
        assert_eq!(txn.effective_amount(), Some(3));
        assert_eq!(txn.timestamp.sort_key(), 0);
    }

    #[test]
    fn unrecognized_movement_has_no_effect() {
        let mut txn = Transaction::new("Towels", Movement::Delivery, 5, Timestamp::now());
        txn.movement = Movement::Unrecognized;
        assert_eq!(txn.effective_amount(), None);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
        assert_eq!(a.short_id().len(), 8);
    }
}
