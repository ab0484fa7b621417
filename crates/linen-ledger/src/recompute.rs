use std::collections::HashMap;

use linen_types::{Document, LinenType, Movement};

/// Counters describing one recomputation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeReport {
    /// Transactions scanned.
    pub evaluated: u64,
    /// Transactions folded into a `plus` or `minus` cache.
    pub applied: u64,
    /// Transactions ignored for a non-positive amount or unknown movement.
    pub skipped: u64,
    /// Linens appended because a transaction named an unknown linen.
    pub synthesized_linens: u64,
}

/// Rebuild every linen's derived caches from the transaction log.
///
/// Deterministic and idempotent: the output depends only on `transactions`
/// and the linen catalogue order, so `recompute(recompute(d)) == recompute(d)`.
pub fn recompute(mut document: Document) -> Document {
    recompute_in_place(&mut document);
    document
}

/// In-place form of [`recompute`] that reports what it did.
pub fn recompute_in_place(document: &mut Document) -> RecomputeReport {
    let mut report = RecomputeReport::default();
    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(document.linens.len());

    for (index, linen) in document.linens.iter_mut().enumerate() {
        linen.clear_counts();
        // Exact duplicates resolve to the later entry.
        lookup.insert(linen.name.clone(), index);
    }

    for transaction in &document.transactions {
        report.evaluated += 1;

        let index = match lookup.get(&transaction.linen_name) {
            Some(&index) => index,
            None => {
                document
                    .linens
                    .push(LinenType::new(transaction.linen_name.clone()));
                let index = document.linens.len() - 1;
                lookup.insert(transaction.linen_name.clone(), index);
                report.synthesized_linens += 1;
                index
            }
        };

        let linen = &mut document.linens[index];
        match (transaction.movement, transaction.amount.positive()) {
            (Movement::Delivery, Some(amount)) => {
                linen.plus.push(amount);
                report.applied += 1;
            }
            (Movement::Collection, Some(amount)) => {
                linen.minus.push(amount);
                report.applied += 1;
            }
            _ => report.skipped += 1,
        }
    }

    report
}
