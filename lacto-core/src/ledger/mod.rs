//! The ferment collection and its derived list view.
//!
//! [`FermentLedger`] owns the in-memory collection and keeps it in sync
//! with a [`KeyValueStore`]. Every mutation rewrites the whole stored
//! collection first and only then updates memory and notifies
//! subscribers, so a listener reading storage always sees the new state.

mod columns;
mod filter;
mod pagination;
mod sort;
mod view;

pub use columns::{Breakpoint, Column, ColumnVisibility};
pub use filter::{matches_query, matches_status, FermentFilter};
pub use pagination::{PageSize, Pagination};
pub use sort::{compare_rows, natural_cmp, SortKey, SortKind, SortingState};
pub use view::{FermentPage, FermentQuery, FermentRow, NarrowSummary};

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;

use crate::codec::{self, CodecError};
use crate::config::LedgerConfig;
use crate::events::{EventBus, FermentEvent};
use crate::models::{DraftError, FermentDraft, FermentEntry};
use crate::storage::{KeyValueStore, StorageError};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("A ferment with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Ferment '{id}' has a {field} that is not a finite number")]
    NonFinite { id: String, field: &'static str },
}

pub struct FermentLedger<S: KeyValueStore> {
    store: S,
    config: LedgerConfig,
    entries: Vec<FermentEntry>,
    events: EventBus,
}

impl<S: KeyValueStore> FermentLedger<S> {
    /// Opens the ledger and loads whatever is stored under the
    /// configured key.
    ///
    /// A stored value that is not a valid collection is an error; the
    /// store is left as it was.
    pub fn open(store: S, config: LedgerConfig) -> Result<Self, LedgerError> {
        let mut ledger = Self {
            store,
            config,
            entries: Vec::new(),
            events: EventBus::new(),
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Re-reads the collection from the store.
    pub fn reload(&mut self) -> Result<(), LedgerError> {
        self.entries = match self.store.get(&self.config.storage_key)? {
            Some(stored) if !stored.trim().is_empty() => {
                codec::decode_entries(&stored).inspect_err(|e| {
                    tracing::error!(key = %self.config.storage_key, error = %e, "Stored ferment data is corrupt");
                })?
            }
            _ => Vec::new(),
        };
        tracing::debug!(entries = self.entries.len(), "Loaded ferments");
        Ok(())
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[FermentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FermentEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Registers a listener called after every persisted mutation.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(FermentEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(listener);
    }

    /// Appends an already assembled entry.
    ///
    /// Numbers must be finite: JSON has no encoding for NaN or infinity.
    pub fn add(&mut self, entry: FermentEntry) -> Result<&FermentEntry, LedgerError> {
        if self.get(&entry.id).is_some() {
            return Err(LedgerError::DuplicateId(entry.id));
        }
        let numbers = [
            ("weight", entry.weight),
            ("brine percentage", entry.brine_percentage),
            ("salt amount", entry.salt_required),
        ];
        if let Some((field, _)) = numbers.iter().find(|(_, n)| !n.is_finite()) {
            return Err(LedgerError::NonFinite {
                id: entry.id,
                field: *field,
            });
        }

        let mut next = self.entries.clone();
        next.push(entry);
        self.commit(next)?;
        tracing::debug!(count = self.entries.len(), "Added ferment");

        let last = self.entries.len() - 1;
        Ok(&self.entries[last])
    }

    /// Validates `draft`, names it if needed and appends it.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        draft: FermentDraft,
        today: NaiveDate,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<&FermentEntry, LedgerError> {
        let entry = draft.assemble(&self.entries, today, now, rng)?;
        self.add(entry)
    }

    /// Removes the entry with `id`. Returns false when there is none, in
    /// which case nothing is written or published.
    pub fn delete(&mut self, id: &str) -> Result<bool, LedgerError> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let next: Vec<FermentEntry> = self
            .entries
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.commit(next)?;
        tracing::debug!(id, "Deleted ferment");
        Ok(true)
    }

    /// Replaces the whole collection with the entries in `json`.
    ///
    /// Nothing changes unless the payload is a valid collection.
    pub fn import_json(&mut self, json: &str) -> Result<usize, LedgerError> {
        let imported = codec::decode_entries(json).inspect_err(|e| {
            tracing::warn!(error = %e, "Rejected ferment import");
        })?;
        let count = imported.len();
        self.commit(imported)?;
        tracing::debug!(count, "Imported ferments");
        Ok(count)
    }

    /// Pretty-printed collection, in the format [`Self::import_json`] accepts.
    pub fn export_json(&self) -> Result<String, LedgerError> {
        Ok(codec::export_entries(&self.entries)?)
    }

    /// Removes the stored collection entirely.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.store.remove(&self.config.storage_key)?;
        self.entries.clear();
        tracing::debug!(key = %self.config.storage_key, "Cleared ferments");
        self.events.publish(FermentEvent::DataUpdated);
        Ok(())
    }

    /// Starting list view from the configuration.
    pub fn default_query(&self) -> FermentQuery {
        FermentQuery::from_config(&self.config)
    }

    /// Runs `query` with the configured status policy.
    pub fn query(&self, query: &FermentQuery, today: NaiveDate) -> FermentPage<'_> {
        query.run(&self.entries, self.config.status_policy, today)
    }

    fn commit(&mut self, next: Vec<FermentEntry>) -> Result<(), LedgerError> {
        let encoded = codec::encode_entries(&next)?;
        self.store.set(&self.config.storage_key, &encoded)?;
        self.entries = next;
        self.events.publish(FermentEvent::DataUpdated);
        Ok(())
    }
}
