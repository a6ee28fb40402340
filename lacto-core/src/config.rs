//! Ledger settings shared by every front end.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ledger::PageSize;
use crate::models::FermentStatus;

/// Key the collection is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "fermentData";

/// Where a ferment's status comes from when it is listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    /// The status stored when the entry was created.
    #[default]
    Snapshot,
    /// Recomputed from the dates and today on every read; storage is untouched.
    Live,
}

impl StatusPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusPolicy::Snapshot => "snapshot",
            StatusPolicy::Live => "live",
        }
    }
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" => Ok(StatusPolicy::Snapshot),
            "live" => Ok(StatusPolicy::Live),
            _ => Err(format!(
                "Invalid status policy '{}'. Valid options: snapshot, live",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub storage_key: String,
    pub status_policy: StatusPolicy,
    pub page_size: PageSize,
    /// Status filter applied to a fresh list view; `None` shows everything.
    pub status_filter: Option<FermentStatus>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            status_policy: StatusPolicy::default(),
            page_size: PageSize::default(),
            status_filter: Some(FermentStatus::Active),
        }
    }
}
