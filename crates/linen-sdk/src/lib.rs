//! Session API for the linen ledger.
//!
//! A [`Tracker`] owns one document and one [`linen_store::DocumentStore`].
//! Opening a tracker loads the stored document, falls back to the built-in
//! catalogue when nothing usable is stored, migrates legacy counts into
//! transactions and recomputes every cache. Each mutation then recomputes
//! and saves the whole document.
//!
//! Save failures never fail a mutation. The first one in a session is
//! reported as a [`PersistenceWarning`]; later mutations retry silently.

pub mod config;
pub mod confirm;
pub mod error;
pub mod tracker;

pub use config::TrackerConfig;
pub use confirm::{AssumeYes, Confirm};
pub use error::{SdkError, SdkResult};
pub use tracker::{LoadReport, LoadSource, Outcome, PersistenceWarning, Tracker};

// Re-export key types
pub use linen_ledger::{
    DocumentValidator, LinenRemoval, Mutation, ProjectionBuilder, SummaryProjection, Totals,
    ValidationReport, Violation, ViolationKind,
};
pub use linen_store::{DocumentStore, InMemoryDocumentStore, JsonFileStore, StoreError};
pub use linen_types::{Amount, Document, LinenType, Movement, Timestamp, Transaction, TransactionId};
