use linen_types::{Document, LinenType, Movement, Timestamp, Transaction, TransactionId};
use tracing::debug;

use crate::error::LedgerError;
use crate::projection::{project_totals, ProjectionBuilder, SummaryProjection, Totals};
use crate::recompute::{recompute_in_place, RecomputeReport};
use crate::validation::{validate_amount, validate_movement, validate_name};

/// Outcome of a mutation addressed at a linen index or transaction id.
///
/// Referencing something that does not exist is a no-op, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation<T = ()> {
    Applied(T),
    NotFound,
}

impl<T> Mutation<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::NotFound => None,
        }
    }
}

/// A linen removed together with its history.
#[derive(Clone, Debug, PartialEq)]
pub struct LinenRemoval {
    pub linen: LinenType,
    pub removed_transactions: usize,
}

/// Owner of one ledger document.
///
/// Every mutation that touches the transaction log ends with a full
/// recomputation, so [`LedgerEngine::document`] always satisfies the cache
/// invariant.
#[derive(Clone, Debug, Default)]
pub struct LedgerEngine {
    document: Document,
}

impl LedgerEngine {
    /// Take ownership of `document` and bring its caches in line with the
    /// ledger.
    pub fn new(document: Document) -> Self {
        Self::load(document).0
    }

    /// Like [`LedgerEngine::new`], also returning what the initial
    /// recomputation did.
    pub fn load(document: Document) -> (Self, RecomputeReport) {
        let mut engine = Self { document };
        let report = engine.recompute();
        (engine, report)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Replace the whole document, returning the previous one.
    pub fn replace(&mut self, document: Document) -> Document {
        let previous = std::mem::replace(&mut self.document, document);
        self.recompute();
        previous
    }

    pub fn recompute(&mut self) -> RecomputeReport {
        let report = recompute_in_place(&mut self.document);
        debug!(
            evaluated = report.evaluated,
            applied = report.applied,
            skipped = report.skipped,
            synthesized = report.synthesized_linens,
            "recomputed linen caches"
        );
        report
    }

    // ---- Catalogue ----

    /// Append a new linen type and return its index.
    ///
    /// The name is trimmed; names are unique case-insensitively.
    pub fn add_linen_type(&mut self, name: &str) -> Result<usize, LedgerError> {
        let name = validate_name(name)?;
        if self.document.linen_index(name).is_some() {
            return Err(LedgerError::Duplicate(name.to_string()));
        }
        self.document.linens.push(LinenType::new(name));
        let index = self.document.linens.len() - 1;
        debug!(index, name, "linen added");
        Ok(index)
    }

    /// Remove the linen at `index` and every transaction naming it.
    pub fn delete_linen_type(&mut self, index: usize) -> Mutation<LinenRemoval> {
        if index >= self.document.linens.len() {
            return Mutation::NotFound;
        }
        let linen = self.document.linens.remove(index);
        let before = self.document.transactions.len();
        self.document
            .transactions
            .retain(|t| t.linen_name != linen.name);
        let removed_transactions = before - self.document.transactions.len();
        self.recompute();
        debug!(name = %linen.name, removed_transactions, "linen removed");
        Mutation::Applied(LinenRemoval {
            linen,
            removed_transactions,
        })
    }

    // ---- Ledger ----

    /// Record a movement for the linen at `linen_index`, timestamped now.
    pub fn add_transaction(
        &mut self,
        linen_index: usize,
        amount: i64,
        movement: Movement,
    ) -> Result<Mutation<TransactionId>, LedgerError> {
        self.add_transaction_at(linen_index, amount, movement, Timestamp::now())
    }

    /// Record a movement with an explicit timestamp.
    pub fn add_transaction_at(
        &mut self,
        linen_index: usize,
        amount: i64,
        movement: Movement,
        timestamp: Timestamp,
    ) -> Result<Mutation<TransactionId>, LedgerError> {
        let amount = validate_amount(amount)?;
        let movement = validate_movement(movement)?;
        let Some(linen) = self.document.linens.get(linen_index) else {
            return Ok(Mutation::NotFound);
        };

        let transaction = Transaction::new(linen.name.clone(), movement, amount, timestamp);
        let id = transaction.id.clone();
        debug!(id = %id, linen = %transaction.linen_name, %movement, amount, "transaction added");
        self.document.transactions.push(transaction);
        self.recompute();
        Ok(Mutation::Applied(id))
    }

    /// Change the amount and movement of an existing transaction.
    ///
    /// Identity, linen and timestamp are unchanged.
    pub fn edit_transaction(
        &mut self,
        id: &TransactionId,
        amount: i64,
        movement: Movement,
    ) -> Result<Mutation, LedgerError> {
        let amount = validate_amount(amount)?;
        let movement = validate_movement(movement)?;
        let Some(transaction) = self.document.transaction_mut(id) else {
            return Ok(Mutation::NotFound);
        };

        transaction.amount = amount.into();
        transaction.movement = movement;
        debug!(id = %id, %movement, amount, "transaction edited");
        self.recompute();
        Ok(Mutation::Applied(()))
    }

    /// Remove a transaction from the ledger.
    pub fn delete_transaction(&mut self, id: &TransactionId) -> Mutation<Transaction> {
        let Some(position) = self.document.transactions.iter().position(|t| &t.id == id) else {
            return Mutation::NotFound;
        };
        let removed = self.document.transactions.remove(position);
        debug!(id = %id, "transaction deleted");
        self.recompute();
        Mutation::Applied(removed)
    }

    /// Clear the ledger, keeping the catalogue. Returns the number of
    /// transactions removed.
    pub fn reset_day(&mut self) -> usize {
        let cleared = self.document.transactions.len();
        self.document.transactions.clear();
        self.recompute();
        debug!(cleared, "day reset");
        cleared
    }

    // ---- Queries ----

    pub fn linen_index(&self, name: &str) -> Option<usize> {
        self.document.linen_index(name)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.document.transaction(id)
    }

    pub fn totals(&self, linen_index: usize) -> Option<Totals> {
        self.document.linen(linen_index).map(project_totals)
    }

    pub fn summary(&self) -> SummaryProjection {
        ProjectionBuilder::summary(&self.document)
    }

    pub fn history(&self) -> Vec<&Transaction> {
        ProjectionBuilder::history(&self.document)
    }
}
