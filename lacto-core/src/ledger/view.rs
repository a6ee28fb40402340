//! Derived table view: filter, sort, then paginate.

use chrono::NaiveDate;
use serde::Serialize;

use super::filter::FermentFilter;
use super::pagination::Pagination;
use super::sort::SortingState;
use crate::config::{LedgerConfig, StatusPolicy};
use crate::format::{format_date, format_percent, format_quantity};
use crate::models::{FermentEntry, FermentStatus};

/// An entry paired with the status it is listed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FermentRow<'a> {
    pub entry: &'a FermentEntry,
    pub status: Option<FermentStatus>,
}

impl<'a> FermentRow<'a> {
    pub fn new(entry: &'a FermentEntry, policy: StatusPolicy, today: NaiveDate) -> Self {
        Self {
            entry,
            status: entry.effective_status(policy, today),
        }
    }

    /// Everything the condensed narrow-screen cell shows.
    pub fn summary(&self, today: NaiveDate) -> NarrowSummary {
        let entry = self.entry;
        let dates = entry.dates().map(|(start, end)| {
            let range = format!("{} - {}", format_date(start), format_date(end));
            match entry.duration() {
                Some(duration) => format!("{} ({})", range, duration),
                None => range,
            }
        });

        NarrowSummary {
            status: self.status,
            name: entry.ferment_name.clone().filter(|n| !n.is_empty()),
            dates,
            remaining: entry.remaining(today),
            brine: format_percent(entry.brine_percentage),
            weight: format_quantity(entry.weight, &entry.unit),
            salt: format_quantity(entry.salt_required, &entry.unit),
            notes: entry.notes.clone().filter(|n| !n.is_empty()),
            tags: entry.tags.iter().map(String::from).collect(),
        }
    }
}

/// Display-ready fields for one entry on a narrow screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrowSummary {
    pub status: Option<FermentStatus>,
    pub name: Option<String>,
    /// `Jan 1, 2024 - Jan 10, 2024 (1 week and 3 days)`
    pub dates: Option<String>,
    pub remaining: Option<String>,
    pub brine: String,
    pub weight: String,
    pub salt: String,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

/// View state for listing ferments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FermentQuery {
    pub filter: FermentFilter,
    pub sorting: SortingState,
    pub pagination: Pagination,
}

impl FermentQuery {
    /// Starting view: configured status filter and page size, newest first.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            filter: FermentFilter::new("", config.status_filter),
            sorting: SortingState::default(),
            pagination: Pagination::new(config.page_size),
        }
    }

    pub fn run<'a>(
        &self,
        entries: &'a [FermentEntry],
        policy: StatusPolicy,
        today: NaiveDate,
    ) -> FermentPage<'a> {
        let mut rows: Vec<FermentRow<'a>> = entries
            .iter()
            .map(|entry| FermentRow::new(entry, policy, today))
            .filter(|row| self.filter.matches(row))
            .collect();
        self.sorting.apply(&mut rows);

        let filtered_rows = rows.len();
        let range = self.pagination.range(filtered_rows);
        let page_rows = rows.drain(range).collect();

        FermentPage {
            rows: page_rows,
            total_rows: entries.len(),
            filtered_rows,
            page_index: self.pagination.page_index,
            page_count: self.pagination.page_count(filtered_rows),
            can_previous: self.pagination.can_previous(),
            can_next: self.pagination.can_next(filtered_rows),
        }
    }
}

/// One page of listed rows plus the counts a footer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FermentPage<'a> {
    pub rows: Vec<FermentRow<'a>>,
    /// Entries in the collection before filtering.
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub page_index: usize,
    pub page_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

impl FermentPage<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Column, PageSize, SortKey};
    use crate::models::TagSet;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Twelve entries created on consecutive days; even ones are dated
    /// and Active as of their creation, odd ones are undated.
    fn collection() -> Vec<FermentEntry> {
        (1..=12)
            .map(|day| {
                let created = Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap();
                let entry = FermentEntry::new(100.0 * day as f64, "grams", 2.0, created)
                    .with_id(format!("id-{}", day))
                    .with_name(format!("Batch {}", day));
                if day % 2 == 0 {
                    entry.with_dates(date(2024, 1, day), date(2024, 1, day + 5), date(2024, 1, day))
                } else {
                    entry
                }
            })
            .collect()
    }

    fn ids(page: &FermentPage<'_>) -> Vec<String> {
        page.rows.iter().map(|r| r.entry.id.clone()).collect()
    }

    #[test]
    fn test_default_query_shows_active_newest_first() {
        let entries = collection();
        let query = FermentQuery::from_config(&LedgerConfig::default());
        let page = query.run(&entries, StatusPolicy::Snapshot, date(2024, 6, 1));

        assert_eq!(page.total_rows, 12);
        assert_eq!(page.filtered_rows, 6);
        assert_eq!(
            ids(&page),
            vec!["id-12", "id-10", "id-8", "id-6", "id-4", "id-2"]
        );
        assert_eq!(page.page_count, 1);
        assert!(!page.can_next);
    }

    #[test]
    fn test_live_policy_recomputes_status() {
        let entries = collection();
        let query = FermentQuery::from_config(&LedgerConfig::default());

        // Long after every end date, nothing is Active any more.
        let page = query.run(&entries, StatusPolicy::Live, date(2024, 6, 1));
        assert_eq!(page.filtered_rows, 0);
        assert!(page.is_empty());

        let mut complete = query.clone();
        complete.filter.status = Some(FermentStatus::Complete);
        let page = complete.run(&entries, StatusPolicy::Live, date(2024, 6, 1));
        assert_eq!(page.filtered_rows, 6);
        // Storage is untouched.
        assert!(entries
            .iter()
            .filter(|e| e.status.is_some())
            .all(|e| e.status == Some(FermentStatus::Active)));
    }

    #[test]
    fn test_paging_through_unfiltered_rows() {
        let entries = collection();
        let mut query = FermentQuery::default();
        query.pagination = Pagination::new(PageSize::new(10).unwrap());

        let page = query.run(&entries, StatusPolicy::Snapshot, date(2024, 6, 1));
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.page_count, 2);
        assert!(page.can_next);
        assert!(!page.can_previous);

        query.pagination.next(page.filtered_rows);
        let page = query.run(&entries, StatusPolicy::Snapshot, date(2024, 6, 1));
        assert_eq!(ids(&page), vec!["id-2", "id-1"]);
        assert!(page.can_previous);
    }

    #[test]
    fn test_filter_then_sort() {
        let entries = collection();
        let query = FermentQuery {
            filter: FermentFilter::new("batch 1", None),
            sorting: SortingState::by(SortKey::asc(Column::Weight)),
            ..FermentQuery::default()
        };
        let page = query.run(&entries, StatusPolicy::Snapshot, date(2024, 6, 1));
        assert_eq!(ids(&page), vec!["id-1", "id-10", "id-11", "id-12"]);
    }

    #[test]
    fn test_summary() {
        let entry = FermentEntry::new(1000.0, "grams", 2.2, Utc::now())
            .with_name("Pickled Radishes")
            .with_tags(TagSet::try_from_input(["quick"]).unwrap())
            .with_dates(date(2024, 1, 1), date(2024, 1, 10), date(2024, 1, 1));
        let row = FermentRow::new(&entry, StatusPolicy::Snapshot, date(2024, 1, 8));
        let summary = row.summary(date(2024, 1, 8));

        assert_eq!(summary.status, Some(FermentStatus::Active));
        assert_eq!(summary.name.as_deref(), Some("Pickled Radishes"));
        assert_eq!(
            summary.dates.as_deref(),
            Some("Jan 1, 2024 - Jan 10, 2024 (1 week and 3 days)")
        );
        assert_eq!(summary.remaining.as_deref(), Some("3 days"));
        assert_eq!(summary.brine, "2.2%");
        assert_eq!(summary.weight, "1,000 g");
        assert_eq!(summary.salt, "22 g");
        assert_eq!(summary.notes, None);
        assert_eq!(summary.tags, vec!["quick"]);
    }
}
