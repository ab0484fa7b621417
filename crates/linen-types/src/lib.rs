//! Foundation types for the linen ledger.
//!
//! This crate provides the data model shared by every other linen crate.
//! The serde mappings match the persisted JSON document exactly, so a
//! document written by an older tracker loads without conversion.
//!
//! # Key Types
//!
//! - [`LinenType`] -- A tracked linen with its derived delivery/collection caches
//! - [`Transaction`] -- One movement in the append-only ledger
//! - [`TransactionId`] -- Opaque transaction identifier (UUID v7 for new entries)
//! - [`Movement`] -- Delivery (`"add"`) or collection (`"remove"`)
//! - [`Amount`] -- Raw persisted quantity with integer-prefix parsing
//! - [`Timestamp`] -- Raw ISO-8601 instant with lenient ordering
//! - [`Document`] -- The persisted root

pub mod amount;
pub mod document;
pub mod error;
pub mod linen;
pub mod temporal;
pub mod transaction;

pub use amount::Amount;
pub use document::Document;
pub use error::TypeError;
pub use linen::LinenType;
pub use temporal::Timestamp;
pub use transaction::{Movement, Transaction, TransactionId};
