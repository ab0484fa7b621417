use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use linen_types::{Document, LinenType, Movement, Timestamp, Transaction};
use tracing::info;

/// Spacing between synthesized legacy transactions.
pub const DEFAULT_SEED_STEP: Duration = Duration::from_secs(60);

/// The default catalogue used when no usable document is stored.
///
/// Counts are in the legacy pre-aggregated shape and are turned into
/// transactions by [`migrate_legacy`].
pub fn seed_catalogue() -> Document {
    Document::with_linens(vec![
        LinenType::with_counts("Dark blue towels", vec![10, 20, 10, 20], vec![10, 5, 4]),
        LinenType::with_counts("Light blue towels", vec![20, 20, 10], vec![10, 8, 3]),
        LinenType::with_counts("Brown large towels", vec![10, 10, 20], vec![13, 12]),
        LinenType::with_counts("Brown medium towels", vec![15, 8], vec![4, 3]),
        LinenType::with_counts("Brown small towels", vec![10, 4], vec![5, 1]),
    ])
}

/// Synthesize one transaction per legacy count.
///
/// Order: linens in catalogue order; within a linen all `plus` entries, then
/// all `minus` entries. Timestamps increase by `step` (at least 1ms) and the
/// last one equals `now`.
pub fn seed_transactions(
    linens: &[LinenType],
    now: DateTime<Utc>,
    step: Duration,
) -> Vec<Transaction> {
    let count: usize = linens.iter().map(|l| l.plus.len() + l.minus.len()).sum();
    let step_ms = i64::try_from(step.as_millis()).unwrap_or(i64::MAX).max(1);

    let entries = linens.iter().flat_map(|linen| {
        linen
            .plus
            .iter()
            .map(move |amount| (linen, Movement::Delivery, *amount))
            .chain(
                linen
                    .minus
                    .iter()
                    .map(move |amount| (linen, Movement::Collection, *amount)),
            )
    });

    entries
        .enumerate()
        .map(|(offset, (linen, movement, amount))| {
            let steps_back = i64::try_from(count - 1 - offset).unwrap_or(i64::MAX);
            let instant = now
                .checked_sub_signed(TimeDelta::milliseconds(steps_back.saturating_mul(step_ms)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            Transaction::new(
                linen.name.clone(),
                movement,
                amount,
                Timestamp::from_datetime(instant),
            )
        })
        .collect()
}

/// Convert legacy counts into ledger transactions.
///
/// Runs only when the ledger is empty and at least one linen carries counts;
/// returns the number of transactions synthesized (0 when skipped).
pub fn migrate_legacy(document: &mut Document, now: DateTime<Utc>, step: Duration) -> usize {
    if !document.has_legacy_counts() {
        return 0;
    }
    document.transactions = seed_transactions(&document.linens, now, step);
    let count = document.transactions.len();
    info!(count, linens = document.linens.len(), "migrated legacy counts into transactions");
    count
}
