use linen_types::Document;

use crate::error::StoreResult;

/// Whole-document persistence.
///
/// All implementations must satisfy these invariants:
/// - `load` after a successful `save(d)` returns a document equal to `d`.
/// - `save` is atomic: a concurrent or interrupted `load` sees either the
///   previous document or the new one, never a mix.
/// - Malformed stored content loads as `Ok(None)`, never as an error.
pub trait DocumentStore: Send + Sync {
    /// Read the stored document.
    ///
    /// Returns `Ok(None)` if nothing is stored or the stored blob is not a
    /// usable document. Returns `Err` on backend failure.
    fn load(&self) -> StoreResult<Option<Document>>;

    /// Replace the stored document.
    fn save(&self, document: &Document) -> StoreResult<()>;
}
