use std::cmp::Reverse;

use linen_types::{Document, LinenType, Transaction};
use serde::Serialize;

/// Delivery/collection totals for one linen or the whole catalogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub plus_total: u64,
    pub minus_total: u64,
    pub balance: i64,
}

impl Totals {
    fn new(plus_total: u64, minus_total: u64) -> Self {
        let balance = i64::try_from(plus_total)
            .unwrap_or(i64::MAX)
            .saturating_sub(i64::try_from(minus_total).unwrap_or(i64::MAX));
        Self {
            plus_total,
            minus_total,
            balance,
        }
    }

    fn combine(self, other: Self) -> Self {
        Self::new(
            self.plus_total.saturating_add(other.plus_total),
            self.minus_total.saturating_add(other.minus_total),
        )
    }

    /// Signed balance for display: `+12`, `-3` or `0`.
    pub fn balance_label(&self) -> String {
        if self.balance > 0 {
            format!("+{}", self.balance)
        } else {
            self.balance.to_string()
        }
    }
}

/// Totals derived from a linen's cached movements.
pub fn project_totals(linen: &LinenType) -> Totals {
    Totals::new(
        linen.plus.iter().fold(0u64, |acc, v| acc.saturating_add(*v)),
        linen.minus.iter().fold(0u64, |acc, v| acc.saturating_add(*v)),
    )
}

/// One row of the daily summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LinenSummary {
    pub name: String,
    pub plus: Vec<u64>,
    pub minus: Vec<u64>,
    pub totals: Totals,
}

/// The daily summary table: one row per linen plus grand totals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SummaryProjection {
    pub rows: Vec<LinenSummary>,
    pub grand: Totals,
}

/// Deterministic read-side views over a document.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn summary(document: &Document) -> SummaryProjection {
        let rows: Vec<LinenSummary> = document
            .linens
            .iter()
            .map(|linen| LinenSummary {
                name: linen.name.clone(),
                plus: linen.plus.clone(),
                minus: linen.minus.clone(),
                totals: project_totals(linen),
            })
            .collect();
        let grand = rows
            .iter()
            .fold(Totals::default(), |acc, row| acc.combine(row.totals));
        SummaryProjection { rows, grand }
    }

    pub fn grand_totals(document: &Document) -> Totals {
        document
            .linens
            .iter()
            .map(project_totals)
            .fold(Totals::default(), Totals::combine)
    }

    /// Transactions ordered most recent first.
    ///
    /// Unparseable timestamps order as the epoch. The sort is stable, so
    /// equal timestamps keep ledger order.
    pub fn history(document: &Document) -> Vec<&Transaction> {
        let mut entries: Vec<&Transaction> = document.transactions.iter().collect();
        entries.sort_by_key(|t| Reverse(t.timestamp.sort_key()));
        entries
    }
}
