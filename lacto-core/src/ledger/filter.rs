//! Free-text and status filtering.

use serde::{Deserialize, Serialize};

use super::view::FermentRow;
use crate::models::FermentStatus;

/// Both filters apply together; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FermentFilter {
    /// Case-insensitive substring searched across the entry's fields.
    pub query: String,
    pub status: Option<FermentStatus>,
}

impl FermentFilter {
    pub fn new(query: impl Into<String>, status: Option<FermentStatus>) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    pub fn matches(&self, row: &FermentRow<'_>) -> bool {
        matches_status(row.status, self.status) && matches_query(row, &self.query)
    }
}

/// Rows without a status never match a status filter.
pub fn matches_status(status: Option<FermentStatus>, wanted: Option<FermentStatus>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => status == Some(wanted),
    }
}

/// Searches name, notes, status, dates, brine, weight, salt and tags.
pub fn matches_query(row: &FermentRow<'_>, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let entry = row.entry;
    let text_fields = [
        entry.ferment_name.as_deref(),
        entry.notes.as_deref(),
        row.status.map(|s| s.as_str()),
    ];
    let found = text_fields.into_iter().flatten().any(|v| contains(v, &needle))
        || entry
            .date_start
            .iter()
            .chain(entry.date_end.iter())
            .any(|d| contains(&d.to_string(), &needle))
        || [entry.brine_percentage, entry.weight, entry.salt_required]
            .iter()
            .any(|n| contains(&n.to_string(), &needle));

    found || entry.tags.iter().any(|t| contains(t, &needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
