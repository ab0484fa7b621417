use chrono::{DateTime, Utc};
use linen_ledger::{
    migrate_legacy, seed_catalogue, DocumentValidator, LedgerEngine, LinenRemoval, Mutation,
    RecomputeReport, SummaryProjection, Totals, ValidationReport,
};
use linen_store::{DocumentStore, InMemoryDocumentStore, JsonFileStore};
use linen_types::{Document, Movement, Transaction, TransactionId};
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::confirm::{delete_transaction_prompt, remove_linen_prompt, Confirm, RESET_DAY_PROMPT};
use crate::error::SdkResult;

/// Where the session's document came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// A stored document with a non-empty catalogue.
    Stored,
    /// The built-in catalogue, because nothing usable was stored.
    Seeded,
    /// Nothing usable was stored and seeding is disabled.
    Empty,
}

/// What happened while opening a session.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadReport {
    pub source: LoadSource,
    /// Transactions synthesized from legacy counts.
    pub migrated: usize,
    pub recompute: RecomputeReport,
    pub warning: Option<PersistenceWarning>,
}

/// Raised the first time a save fails in a session.
///
/// The in-memory document stays authoritative and later mutations keep
/// retrying the save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistenceWarning {
    pub message: String,
}

impl std::fmt::Display for PersistenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "changes are kept for this session but could not be saved: {}",
            self.message
        )
    }
}

/// Result of a tracker mutation plus any persistence warning it raised.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome<T> {
    pub value: T,
    pub warning: Option<PersistenceWarning>,
}

/// A tracker session: one document, one store.
///
/// Every successful mutation recomputes the caches and saves the whole
/// document.
pub struct Tracker<S: DocumentStore> {
    engine: LedgerEngine,
    store: S,
    config: TrackerConfig,
    load: LoadReport,
    warned: bool,
    unsaved: bool,
}

impl<S: DocumentStore> Tracker<S> {
    /// Open a session, seeding and migrating as needed.
    pub fn open(store: S, config: TrackerConfig) -> Self {
        Self::open_at(store, config, Utc::now())
    }

    /// Like [`Tracker::open`] with an explicit clock for seeded timestamps.
    pub fn open_at(store: S, config: TrackerConfig, now: DateTime<Utc>) -> Self {
        let stored = match store.load() {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "could not read stored document, starting from defaults");
                None
            }
        };

        let (mut document, source) = match stored {
            Some(doc) if !doc.linens.is_empty() => (doc, LoadSource::Stored),
            _ if config.seed_on_empty => (seed_catalogue(), LoadSource::Seeded),
            stored => (stored.unwrap_or_default(), LoadSource::Empty),
        };

        let migrated = migrate_legacy(&mut document, now, config.seed_step());
        let (engine, recompute) = LedgerEngine::load(document);

        let mut tracker = Self {
            engine,
            store,
            config,
            load: LoadReport {
                source,
                migrated,
                recompute,
                warning: None,
            },
            warned: false,
            unsaved: false,
        };
        if source == LoadSource::Seeded || migrated > 0 {
            tracker.load.warning = tracker.persist();
        }
        info!(
            source = ?source,
            migrated,
            linens = tracker.document().linens.len(),
            transactions = tracker.document().transactions.len(),
            "tracker opened"
        );
        tracker
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn document(&self) -> &Document {
        self.engine.document()
    }

    /// `true` while the last save attempt failed.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    // ---- Mutations ----

    pub fn add_linen_type(&mut self, name: &str) -> SdkResult<Outcome<usize>> {
        let index = self.engine.add_linen_type(name)?;
        Ok(self.saved(index))
    }

    pub fn add_transaction(
        &mut self,
        linen_index: usize,
        amount: i64,
        movement: Movement,
    ) -> SdkResult<Outcome<Mutation<TransactionId>>> {
        let result = self.engine.add_transaction(linen_index, amount, movement)?;
        Ok(self.saved_if_applied(result))
    }

    pub fn edit_transaction(
        &mut self,
        id: &TransactionId,
        amount: i64,
        movement: Movement,
    ) -> SdkResult<Outcome<Mutation>> {
        let result = self.engine.edit_transaction(id, amount, movement)?;
        Ok(self.saved_if_applied(result))
    }

    pub fn delete_transaction(&mut self, id: &TransactionId) -> Outcome<Mutation<Transaction>> {
        let result = self.engine.delete_transaction(id);
        self.saved_if_applied(result)
    }

    pub fn delete_linen_type(&mut self, index: usize) -> Outcome<Mutation<LinenRemoval>> {
        let result = self.engine.delete_linen_type(index);
        self.saved_if_applied(result)
    }

    pub fn reset_day(&mut self) -> Outcome<usize> {
        let cleared = self.engine.reset_day();
        self.saved(cleared)
    }

    // ---- Confirmed mutations ----
    //
    // `None` means the user declined. A missing target is reported as
    // `Mutation::NotFound` without asking.

    pub fn delete_linen_type_confirmed(
        &mut self,
        index: usize,
        confirm: &mut impl Confirm,
    ) -> Option<Outcome<Mutation<LinenRemoval>>> {
        let Some(linen) = self.document().linen(index) else {
            return Some(self.unchanged(Mutation::NotFound));
        };
        if !confirm.confirm(&remove_linen_prompt(&linen.name)) {
            return None;
        }
        Some(self.delete_linen_type(index))
    }

    pub fn delete_transaction_confirmed(
        &mut self,
        id: &TransactionId,
        confirm: &mut impl Confirm,
    ) -> Option<Outcome<Mutation<Transaction>>> {
        let Some(transaction) = self.document().transaction(id) else {
            return Some(self.unchanged(Mutation::NotFound));
        };
        if !confirm.confirm(&delete_transaction_prompt(transaction)) {
            return None;
        }
        Some(self.delete_transaction(id))
    }

    pub fn reset_day_confirmed(&mut self, confirm: &mut impl Confirm) -> Option<Outcome<usize>> {
        if !confirm.confirm(RESET_DAY_PROMPT) {
            return None;
        }
        Some(self.reset_day())
    }

    // ---- Queries ----

    pub fn linen_index(&self, name: &str) -> Option<usize> {
        self.engine.linen_index(name)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.engine.transaction(id)
    }

    pub fn totals(&self, linen_index: usize) -> Option<Totals> {
        self.engine.totals(linen_index)
    }

    pub fn summary(&self) -> SummaryProjection {
        self.engine.summary()
    }

    /// Transactions, most recent first.
    pub fn history(&self) -> Vec<&Transaction> {
        self.engine.history()
    }

    pub fn validate(&self) -> ValidationReport {
        DocumentValidator::validate(self.document())
    }

    // ---- Persistence ----

    fn saved<T>(&mut self, value: T) -> Outcome<T> {
        let warning = self.persist();
        Outcome { value, warning }
    }

    fn saved_if_applied<T>(&mut self, result: Mutation<T>) -> Outcome<Mutation<T>> {
        if result.is_applied() {
            self.saved(result)
        } else {
            self.unchanged(result)
        }
    }

    fn unchanged<T>(&self, value: T) -> Outcome<T> {
        Outcome {
            value,
            warning: None,
        }
    }

    fn persist(&mut self) -> Option<PersistenceWarning> {
        match self.store.save(self.engine.document()) {
            Ok(()) => {
                if self.unsaved {
                    info!("storage available again, document saved");
                }
                self.unsaved = false;
                None
            }
            Err(err) => {
                warn!(error = %err, "failed to save linen document");
                self.unsaved = true;
                if self.warned {
                    return None;
                }
                self.warned = true;
                Some(PersistenceWarning {
                    message: err.to_string(),
                })
            }
        }
    }
}

impl Tracker<JsonFileStore> {
    /// Open the JSON document at `config.data_path`.
    pub fn open_file(config: TrackerConfig) -> Self {
        let store = JsonFileStore::new(&config.data_path);
        Self::open(store, config)
    }
}

impl Tracker<InMemoryDocumentStore> {
    /// Open an empty in-memory store keyed by `config.storage_key`.
    pub fn in_memory(config: TrackerConfig) -> Self {
        let store = InMemoryDocumentStore::with_key(config.storage_key.clone());
        Self::open(store, config)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use linen_ledger::DEFAULT_SEED_STEP;
    use linen_types::LinenType;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
    }

    fn open(store: InMemoryDocumentStore) -> Tracker<InMemoryDocumentStore> {
        Tracker::open_at(store, TrackerConfig::default(), now())
    }

    #[test]
    fn empty_store_is_seeded_and_persisted() {
        let tracker = open(InMemoryDocumentStore::new());
        let report = tracker.load_report();
        assert_eq!(report.source, LoadSource::Seeded);
        assert_eq!(report.migrated, 26);
        assert!(report.warning.is_none());
        assert_eq!(tracker.totals(0).unwrap().balance, 41);
        assert!(tracker.validate().is_valid());

        let stored = tracker.store().load().unwrap().unwrap();
        assert_eq!(&stored, tracker.document());
    }

    #[test]
    fn reopening_does_not_reseed() {
        let tracker = open(InMemoryDocumentStore::new());
        let first = tracker.document().clone();
        let store = tracker.store;

        let reopened = open(store);
        assert_eq!(reopened.load_report().source, LoadSource::Stored);
        assert_eq!(reopened.load_report().migrated, 0);
        assert_eq!(reopened.document(), &first);
    }

    #[test]
    fn malformed_blob_falls_back_to_seed() {
        let store = InMemoryDocumentStore::new();
        store.put_raw("{not json").unwrap();
        let tracker = open(store);
        assert_eq!(tracker.load_report().source, LoadSource::Seeded);
        assert_eq!(tracker.document().linens.len(), 5);

        let store = InMemoryDocumentStore::new();
        store.put_raw(r#"{"linens": "towels", "transactions": []}"#).unwrap();
        assert_eq!(open(store).load_report().source, LoadSource::Seeded);
    }

    #[test]
    fn legacy_document_is_migrated_once() {
        let store = InMemoryDocumentStore::new();
        store
            .put_raw(r#"{"linens": [{"name": "Robes", "plus": [5, 2], "minus": [3]}]}"#)
            .unwrap();
        let tracker = open(store);
        assert_eq!(tracker.load_report().source, LoadSource::Stored);
        assert_eq!(tracker.load_report().migrated, 3);
        assert_eq!(tracker.totals(0).unwrap().balance, 4);

        let stamps: Vec<_> = tracker
            .document()
            .transactions
            .iter()
            .map(|t| t.timestamp.instant().unwrap())
            .collect();
        assert_eq!(stamps.last(), Some(&now()));
        assert_eq!(stamps[1] - stamps[0], chrono::TimeDelta::from_std(DEFAULT_SEED_STEP).unwrap());

        let reopened = open(tracker.store);
        assert_eq!(reopened.load_report().migrated, 0);
        assert_eq!(reopened.document().transactions.len(), 3);
    }

    #[test]
    fn empty_catalogue_is_replaced_by_seed() {
        let store = InMemoryDocumentStore::new();
        let mut doc = Document::new();
        doc.transactions.push(Transaction::new(
            "Robes",
            Movement::Delivery,
            7,
            linen_types::Timestamp::from("2025-01-01T00:00:00.000Z"),
        ));
        store.save(&doc).unwrap();

        let tracker = open(store);
        let report = tracker.load_report();
        assert_eq!(report.source, LoadSource::Seeded);
        assert_eq!(report.migrated, 26);
        assert_eq!(tracker.document().linens.len(), 5);
        assert_eq!(tracker.document().transactions.len(), 26);
        assert!(tracker.document().linens.iter().all(|l| l.name != "Robes"));
        assert!(tracker.document().transactions.iter().all(|t| t.linen_name != "Robes"));
        assert_eq!(tracker.totals(0).unwrap().balance, 41);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let config = TrackerConfig {
            seed_on_empty: false,
            ..TrackerConfig::default()
        };
        let tracker = Tracker::open_at(InMemoryDocumentStore::new(), config, now());
        assert_eq!(tracker.load_report().source, LoadSource::Empty);
        assert!(tracker.document().linens.is_empty());
        assert!(tracker.store().raw().is_none());
    }

    #[test]
    fn mutations_are_persisted() {
        let mut tracker = open(InMemoryDocumentStore::new());
        let index = tracker.add_linen_type("Pillowcases").unwrap().value;
        let id = tracker
            .add_transaction(index, 12, Movement::Delivery)
            .unwrap()
            .value
            .applied()
            .unwrap();
        tracker.edit_transaction(&id, 9, Movement::Delivery).unwrap();

        let stored = tracker.store().load().unwrap().unwrap();
        assert_eq!(&stored, tracker.document());
        assert_eq!(tracker.totals(index).unwrap().plus_total, 9);
    }

    #[test]
    fn validation_errors_surface_as_sdk_errors() {
        let mut tracker = open(InMemoryDocumentStore::new());
        let err = tracker.add_transaction(0, 0, Movement::Delivery).unwrap_err();
        assert!(err.is_validation());
        let err = tracker.add_linen_type("dark BLUE towels").unwrap_err();
        assert!(!err.is_validation());
    }

    #[test]
    fn persistence_warning_is_raised_once() {
        let mut tracker = open(InMemoryDocumentStore::new());
        tracker.store().set_read_only(true);

        let first = tracker.add_linen_type("Robes").unwrap();
        assert!(first.warning.is_some());
        assert!(tracker.has_unsaved_changes());
        let second = tracker.add_transaction(first.value, 3, Movement::Delivery).unwrap();
        assert!(second.warning.is_none());
        assert!(second.value.is_applied());
        assert_eq!(tracker.totals(first.value).unwrap().balance, 3);

        tracker.store().set_read_only(false);
        let third = tracker.reset_day();
        assert!(third.warning.is_none());
        assert!(!tracker.has_unsaved_changes());
        let stored = tracker.store().load().unwrap().unwrap();
        assert_eq!(stored.linens.len(), 6);
        assert!(stored.transactions.is_empty());
    }

    #[test]
    fn missing_targets_do_not_save() {
        let mut tracker = open(InMemoryDocumentStore::new());
        tracker.store().set_read_only(true);
        let outcome = tracker.delete_linen_type(99);
        assert_eq!(outcome.value, Mutation::NotFound);
        assert!(outcome.warning.is_none());
        assert!(!tracker.has_unsaved_changes());
    }

    #[test]
    fn declined_confirmation_leaves_document_unchanged() {
        let mut tracker = open(InMemoryDocumentStore::new());
        let before = tracker.document().clone();
        let id = before.transactions[0].id.clone();
        let mut prompts = Vec::new();
        let mut decline = |m: &str| {
            prompts.push(m.to_string());
            false
        };

        assert!(tracker.delete_linen_type_confirmed(0, &mut decline).is_none());
        assert!(tracker.delete_transaction_confirmed(&id, &mut decline).is_none());
        assert!(tracker.reset_day_confirmed(&mut decline).is_none());
        assert_eq!(tracker.document(), &before);
        assert_eq!(prompts.len(), 3);
        assert_eq!(
            prompts[0],
            "Remove \"Dark blue towels\"?\nThis will delete its totals and transactions."
        );
        assert_eq!(prompts[2], RESET_DAY_PROMPT);
    }

    #[test]
    fn accepted_confirmation_applies() {
        let mut tracker = open(InMemoryDocumentStore::new());
        let mut yes = crate::confirm::AssumeYes;
        let removal = tracker
            .delete_linen_type_confirmed(0, &mut yes)
            .unwrap()
            .value
            .applied()
            .unwrap();
        assert_eq!(removal.removed_transactions, 7);
        assert_eq!(tracker.document().transactions.len(), 19);

        let missing = tracker.delete_linen_type_confirmed(42, &mut |_: &str| -> bool {
            panic!("must not ask about a missing linen")
        });
        assert_eq!(missing.map(|o| o.value), Some(Mutation::NotFound));

        assert_eq!(tracker.reset_day_confirmed(&mut yes).unwrap().value, 19);
    }

    #[test]
    fn file_backed_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let config = TrackerConfig::default().with_data_path(&path);

        let mut tracker = Tracker::open_at(JsonFileStore::new(&path), config.clone(), now());
        tracker.add_linen_type("Robes").unwrap();
        let robes = tracker.linen_index("robes").unwrap();
        tracker.add_transaction(robes, 4, Movement::Collection).unwrap();
        let expected = tracker.document().clone();
        drop(tracker);

        let reopened = Tracker::open_at(JsonFileStore::new(&path), config, now());
        assert_eq!(reopened.load_report().source, LoadSource::Stored);
        assert_eq!(reopened.document(), &expected);
        assert_eq!(reopened.totals(robes).unwrap().balance, -4);
        assert_eq!(reopened.document().linens[robes], LinenType::with_counts("Robes", vec![], vec![4]));
    }

    #[test]
    fn in_memory_uses_configured_key() {
        let config = TrackerConfig {
            storage_key: "linen-test".into(),
            ..TrackerConfig::default()
        };
        let tracker = Tracker::in_memory(config);
        assert_eq!(tracker.store().key(), "linen-test");
        assert!(tracker.store().raw().is_some());
    }

    #[test]
    fn open_file_uses_data_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let tracker = Tracker::open_file(TrackerConfig::default().with_data_path(&path));
        assert_eq!(tracker.store().path(), path.as_path());
        assert!(path.exists());
    }
}
