//! Transaction ledger for linen stock.
//!
//! This crate is the heart of the tracker. Balances are never stored as
//! authoritative state: every linen's `plus`/`minus` caches are derived from
//! the transaction log by a full, deterministic recomputation that runs after
//! each mutation. It provides:
//! - [`recompute`] / [`recompute_in_place`] -- the pure rebuild of caches
//! - [`LedgerEngine`] -- owned document plus the mutation operations
//! - Projections (per-linen totals, grand totals, most-recent-first history)
//! - Seed catalogue and one-time migration of legacy pre-aggregated counts
//! - Document validation (orphans, stale caches, duplicates)

pub mod engine;
pub mod error;
pub mod projection;
pub mod recompute;
pub mod seed;
pub mod validation;

pub use engine::{LedgerEngine, LinenRemoval, Mutation};
pub use error::LedgerError;
pub use projection::{project_totals, LinenSummary, ProjectionBuilder, SummaryProjection, Totals};
pub use recompute::{recompute, recompute_in_place, RecomputeReport};
pub use seed::{migrate_legacy, seed_catalogue, seed_transactions, DEFAULT_SEED_STEP};
pub use validation::{DocumentValidator, ValidationReport, Violation, ViolationKind};
