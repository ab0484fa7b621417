use linen_types::{Timestamp, Transaction};

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Approves everything. Used for non-interactive runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }
}

pub const RESET_DAY_PROMPT: &str =
    "Reset the day? This keeps your linen types but clears daily movements.";

pub fn remove_linen_prompt(name: &str) -> String {
    format!("Remove \"{name}\"?\nThis will delete its totals and transactions.")
}

pub fn delete_transaction_prompt(transaction: &Transaction) -> String {
    format!(
        "Delete this entry?\n{} \u{b7} {} \u{b7} {} {}",
        display_time(&transaction.timestamp),
        transaction.linen_name,
        transaction.movement.label(),
        transaction.amount,
    )
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, or the raw text when it does not parse.
pub fn display_time(timestamp: &Timestamp) -> String {
    match timestamp.instant() {
        Some(instant) => instant.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.as_str().to_string(),
    }
}
