use serde::{Deserialize, Serialize};

use crate::linen::LinenType;
use crate::transaction::{Transaction, TransactionId};

/// Persisted root: the linen catalogue and the transaction ledger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub linens: Vec<LinenType>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_linens(linens: Vec<LinenType>) -> Self {
        Self {
            linens,
            transactions: Vec::new(),
        }
    }

    /// Index of the first linen whose name matches case-insensitively.
    pub fn linen_index(&self, name: &str) -> Option<usize> {
        self.linens.iter().position(|l| l.name_matches(name))
    }

    pub fn linen(&self, index: usize) -> Option<&LinenType> {
        self.linens.get(index)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| &t.id == id)
    }

    pub fn transaction_mut(&mut self, id: &TransactionId) -> Option<&mut Transaction> {
        self.transactions.iter_mut().find(|t| &t.id == id)
    }

    /// Transactions referring to `linen_name` (exact match), in ledger order.
    pub fn transactions_for<'a>(
        &'a self,
        linen_name: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.linen_name == linen_name)
    }

    /// `true` when there is no ledger yet but the catalogue carries
    /// pre-aggregated counts.
    pub fn has_legacy_counts(&self) -> bool {
        self.transactions.is_empty() && self.linens.iter().any(LinenType::has_counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Movement, Timestamp};

    #[test]
    fn lookup_by_name_ignores_case() {
        let doc = Document::with_linens(vec![LinenType::new("Towels"), LinenType::new("Sheets")]);
        assert_eq!(doc.linen_index("sheets"), Some(1));
        assert_eq!(doc.linen_index("robes"), None);
    }

    #[test]
    fn transactions_for_uses_exact_name() {
        let mut doc = Document::with_linens(vec![LinenType::new("Towels")]);
        doc.transactions.push(Transaction::new("Towels", Movement::Delivery, 1, Timestamp::now()));
        doc.transactions.push(Transaction::new("towels", Movement::Delivery, 2, Timestamp::now()));
        assert_eq!(doc.transactions_for("Towels").count(), 1);
    }

    #[test]
    fn legacy_counts_only_without_ledger() {
        let mut doc = Document::with_linens(vec![LinenType::with_counts("Towels", vec![3], vec![])]);
        assert!(doc.has_legacy_counts());
        doc.transactions.push(Transaction::new("Towels", Movement::Delivery, 3, Timestamp::now()));
        assert!(!doc.has_legacy_counts());
    }
}
