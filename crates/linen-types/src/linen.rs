use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::amount::Amount;

/// A tracked linen type.
///
/// `plus` and `minus` are caches derived from the transaction log. Older
/// documents stored them as the only record of movements; those arrays are
/// decoded leniently (entries without a positive integer value are dropped,
/// a missing or non-array field is empty) and migrated into transactions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinenType {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_counts")]
    pub plus: Vec<u64>,
    #[serde(default, deserialize_with = "lenient_counts")]
    pub minus: Vec<u64>,
}

impl LinenType {
    /// A linen with no movements.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plus: Vec::new(),
            minus: Vec::new(),
        }
    }

    /// A linen carrying legacy pre-aggregated counts.
    pub fn with_counts(name: impl Into<String>, plus: Vec<u64>, minus: Vec<u64>) -> Self {
        Self {
            name: name.into(),
            plus,
            minus,
        }
    }

    /// Case-insensitive name comparison used for uniqueness and lookup.
    pub fn name_matches(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }

    pub fn has_counts(&self) -> bool {
        !self.plus.is_empty() || !self.minus.is_empty()
    }

    pub fn clear_counts(&mut self) {
        self.plus.clear();
        self.minus.clear();
    }
}

fn lenient_counts<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| Amount::from(item).positive())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_match_case_insensitively() {
        let linen = LinenType::new("Towels");
        assert!(linen.name_matches("towels"));
        assert!(linen.name_matches("TOWELS"));
        assert!(!linen.name_matches("Towel"));
    }

    #[test]
    fn legacy_counts_decode_leniently() {
        let linen: LinenType = serde_json::from_value(json!({
            "name": "Sheets",
            "plus": [10, "5", -2, null, 3.7],
            "minus": "oops"
        }))
        .unwrap();
        assert_eq!(linen.plus, vec![10, 5, 3]);
        assert!(linen.minus.is_empty());
    }

    #[test]
    fn missing_counts_default_to_empty() {
        let linen: LinenType = serde_json::from_value(json!({ "name": "Robes" })).unwrap();
        assert!(!linen.has_counts());
    }
}
