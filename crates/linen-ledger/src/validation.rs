use std::collections::{HashMap, HashSet};

use linen_types::{Document, Movement};
use serde::Serialize;

use crate::error::LedgerError;
use crate::recompute::recompute;

/// Result of document validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub linen_count: usize,
    pub transaction_count: usize,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns `true` if the derived caches agree with the ledger and every
    /// transaction names a known linen. Ignored amounts or movements do not
    /// count against consistency.
    pub fn is_consistent(&self) -> bool {
        !self.violations.iter().any(|v| {
            matches!(
                v.kind,
                ViolationKind::OrphanTransaction | ViolationKind::StaleCache
            )
        })
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}

/// A specific problem detected during validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Linen name or transaction id the violation refers to.
    pub subject: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    OrphanTransaction,
    StaleCache,
    DuplicateTransactionId,
    DuplicateLinenName,
    IgnoredAmount,
    UnrecognizedMovement,
    UnparseableTimestamp,
}

/// Read-only document checks.
pub struct DocumentValidator;

impl DocumentValidator {
    pub fn validate(document: &Document) -> ValidationReport {
        let mut violations = Vec::new();

        let mut seen_names = HashMap::new();
        for linen in &document.linens {
            let key = linen.name.to_lowercase();
            if let Some(first) = seen_names.insert(key, linen.name.clone()) {
                violations.push(Violation {
                    kind: ViolationKind::DuplicateLinenName,
                    subject: linen.name.clone(),
                    description: format!("name collides with {first:?}"),
                });
            }
        }

        let known: HashSet<&str> = document.linens.iter().map(|l| l.name.as_str()).collect();
        let mut seen_ids = HashSet::new();
        for transaction in &document.transactions {
            let subject = transaction.id.to_string();
            if !seen_ids.insert(&transaction.id) {
                violations.push(Violation {
                    kind: ViolationKind::DuplicateTransactionId,
                    subject: subject.clone(),
                    description: "transaction id appears more than once".into(),
                });
            }
            if !known.contains(transaction.linen_name.as_str()) {
                violations.push(Violation {
                    kind: ViolationKind::OrphanTransaction,
                    subject: subject.clone(),
                    description: format!("linen {:?} is not in the catalogue", transaction.linen_name),
                });
            }
            if transaction.amount.positive().is_none() {
                violations.push(Violation {
                    kind: ViolationKind::IgnoredAmount,
                    subject: subject.clone(),
                    description: format!("amount {} is not a positive number", transaction.amount),
                });
            }
            if transaction.movement == Movement::Unrecognized {
                violations.push(Violation {
                    kind: ViolationKind::UnrecognizedMovement,
                    subject: subject.clone(),
                    description: "movement is neither a delivery nor a collection".into(),
                });
            }
            if transaction.timestamp.instant().is_none() {
                violations.push(Violation {
                    kind: ViolationKind::UnparseableTimestamp,
                    subject,
                    description: format!("timestamp {:?} does not parse", transaction.timestamp.as_str()),
                });
            }
        }

        let rebuilt = recompute(document.clone());
        for (stored, derived) in document.linens.iter().zip(&rebuilt.linens) {
            if stored.plus != derived.plus || stored.minus != derived.minus {
                violations.push(Violation {
                    kind: ViolationKind::StaleCache,
                    subject: stored.name.clone(),
                    description: "cached movements differ from the transaction log".into(),
                });
            }
        }

        ValidationReport {
            linen_count: document.linens.len(),
            transaction_count: document.transactions.len(),
            violations,
        }
    }
}

/// Trimmed, non-empty linen name.
pub fn validate_name(name: &str) -> Result<&str, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(LedgerError::EmptyName)
    } else {
        Ok(trimmed)
    }
}

pub fn validate_amount(amount: i64) -> Result<u64, LedgerError> {
    if amount > 0 {
        Ok(amount as u64)
    } else {
        Err(LedgerError::InvalidAmount(amount))
    }
}

pub fn validate_movement(movement: Movement) -> Result<Movement, LedgerError> {
    if movement.is_recognized() {
        Ok(movement)
    } else {
        Err(LedgerError::UnrecognizedMovement)
    }
}
