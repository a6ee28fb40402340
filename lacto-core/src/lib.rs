//! Lacto Core Library
//!
//! Salt-brine calculation, ferment lifecycle dates and the persisted
//! ferment log shared by Lacto front ends.

pub mod codec;
pub mod config;
pub mod events;
pub mod format;
pub mod ledger;
pub mod models;
pub mod naming;
pub mod reminder;
pub mod salt;
pub mod share;
pub mod storage;
pub mod time;

pub use codec::CodecError;
pub use config::{LedgerConfig, StatusPolicy};
pub use events::{EventBus, FermentEvent};
pub use ledger::{
    Column, ColumnVisibility, FermentFilter, FermentLedger, FermentPage, FermentQuery,
    FermentRow, LedgerError, PageSize, Pagination, SortKey, SortingState,
};
pub use models::{
    DraftError, FermentDraft, FermentEntry, FermentStatus, TagError, TagSet, Unit, UnitKind,
};
pub use salt::salt_required;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
