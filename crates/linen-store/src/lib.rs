//! Document storage for the linen ledger.
//!
//! The ledger persists one JSON document holding the linen catalogue and the
//! transaction log. Stores are opaque blob holders: they never interpret the
//! ledger, they only decide whether a stored blob is a usable document.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- key/value store for tests and embedding
//! - [`JsonFileStore`] -- one JSON file, replaced atomically on every save
//!
//! # Design Rules
//!
//! 1. `save` replaces the whole document; there are no partial writes.
//! 2. A blob that is not valid JSON, or lacks a `linens` array, loads as
//!    "absent" so callers fall back to the seed catalogue.
//! 3. I/O errors are propagated; only malformed content is downgraded.

pub mod codec;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use codec::{decode_document, encode_document};
pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::{InMemoryDocumentStore, DEFAULT_STORAGE_KEY};
pub use traits::DocumentStore;
