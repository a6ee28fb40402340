//! Multi-column sorting of ferment rows.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use super::columns::Column;
use super::view::FermentRow;

/// Comparator family for a sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Case-insensitive text with digit runs compared as numbers.
    Alphanumeric,
    Numeric,
    DateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: Column,
    pub desc: bool,
}

impl SortKey {
    pub fn asc(column: Column) -> Self {
        Self {
            column,
            desc: false,
        }
    }

    pub fn desc(column: Column) -> Self {
        Self { column, desc: true }
    }
}

/// Parses `column`, `column:asc` or `column:desc`. A bare column sorts
/// descending, like a first header click.
impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, Some(direction)),
            None => (s, None),
        };
        let column: Column = column.parse()?;
        if !column.is_sortable() {
            return Err(format!("Column '{}' cannot be sorted", column));
        }
        match direction.map(|d| d.trim().to_lowercase()).as_deref() {
            None | Some("desc") => Ok(SortKey::desc(column)),
            Some("asc") => Ok(SortKey::asc(column)),
            Some(other) => Err(format!(
                "Invalid sort direction '{}'. Use asc or desc",
                other
            )),
        }
    }
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingState(Vec<SortKey>);

impl SortingState {
    /// No sorting: rows keep collection order.
    pub fn unsorted() -> Self {
        Self(Vec::new())
    }

    /// Sorts by `key` alone. Unsortable columns give an unsorted state.
    pub fn by(key: SortKey) -> Self {
        if key.column.is_sortable() {
            Self(vec![key])
        } else {
            Self::unsorted()
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Header click: descending, then ascending, then unsorted.
    ///
    /// Sorting by a different column replaces every existing key.
    pub fn toggle(&mut self, column: Column) {
        if !column.is_sortable() {
            return;
        }
        let next = match self.0.as_slice() {
            [only] if only.column == column => next_direction(only.desc),
            _ => Some(true),
        };
        self.0 = next
            .map(|desc| vec![SortKey { column, desc }])
            .unwrap_or_default();
    }

    /// Multi-sort click: cycles `column` in place or appends it as the
    /// lowest-priority key.
    pub fn toggle_multi(&mut self, column: Column) {
        if !column.is_sortable() {
            return;
        }
        match self.0.iter().position(|k| k.column == column) {
            Some(pos) => match next_direction(self.0[pos].desc) {
                Some(desc) => self.0[pos].desc = desc,
                None => {
                    self.0.remove(pos);
                }
            },
            None => self.0.push(SortKey::desc(column)),
        }
    }

    /// Stable sort of `rows` by every key in order.
    pub fn apply(&self, rows: &mut [FermentRow<'_>]) {
        if self.0.is_empty() {
            return;
        }
        rows.sort_by(|a, b| {
            self.0
                .iter()
                .map(|key| compare_rows(key, a, b))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }
}

/// Keeps the first key per column and skips unsortable columns.
impl FromIterator<SortKey> for SortingState {
    fn from_iter<I: IntoIterator<Item = SortKey>>(iter: I) -> Self {
        let mut keys: Vec<SortKey> = Vec::new();
        for key in iter {
            if key.column.is_sortable() && !keys.iter().any(|k| k.column == key.column) {
                keys.push(key);
            }
        }
        Self(keys)
    }
}

/// Sorted by creation date, newest first.
impl Default for SortingState {
    fn default() -> Self {
        Self(vec![SortKey::desc(Column::DateCreated)])
    }
}

fn next_direction(desc: bool) -> Option<bool> {
    if desc {
        Some(false)
    } else {
        None
    }
}

/// Compares two rows on one key. Missing values go last either way.
pub fn compare_rows(key: &SortKey, a: &FermentRow<'_>, b: &FermentRow<'_>) -> Ordering {
    let (ea, eb) = (a.entry, b.entry);
    match key.column {
        Column::Status => present_first(
            a.status.map(|s| s.as_str()),
            b.status.map(|s| s.as_str()),
            key.desc,
            |x, y| natural_cmp(x, y),
        ),
        Column::FermentName => present_first(
            ea.ferment_name.as_deref(),
            eb.ferment_name.as_deref(),
            key.desc,
            |x, y| natural_cmp(x, y),
        ),
        Column::BrinePercentage => {
            directed(ea.brine_percentage.total_cmp(&eb.brine_percentage), key.desc)
        }
        Column::Weight => directed(ea.weight.total_cmp(&eb.weight), key.desc),
        Column::SaltRequired => directed(ea.salt_required.total_cmp(&eb.salt_required), key.desc),
        Column::DateCreated => {
            present_first(ea.date_created, eb.date_created, key.desc, Ord::cmp)
        }
        Column::DateStart => present_first(ea.date_start, eb.date_start, key.desc, Ord::cmp),
        Column::DateEnd | Column::RemainingDuration => {
            present_first(ea.date_end, eb.date_end, key.desc, Ord::cmp)
        }
        Column::NarrowView
        | Column::TotalDuration
        | Column::Notes
        | Column::Tags
        | Column::Actions => Ordering::Equal,
    }
}

fn directed(ord: Ordering, desc: bool) -> Ordering {
    if desc {
        ord.reverse()
    } else {
        ord
    }
}

fn present_first<T, F>(a: Option<T>, b: Option<T>, desc: bool, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => directed(cmp(&a, &b), desc),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Case-insensitive comparison treating digit runs as numbers, so
/// `"A9"` sorts before `"a10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ord = compare_digit_runs(&take_digits(&mut left), &take_digits(&mut right));
                if ord.is_ne() {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                if l != r {
                    return l.cmp(&r);
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FermentEntry, FermentStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn entry(name: Option<&str>, weight: f64, day: u32) -> FermentEntry {
        let created = Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap();
        let mut e = FermentEntry::new(weight, "grams", 2.0, created).with_id(format!("id-{}", day));
        e.ferment_name = name.map(String::from);
        e
    }

    fn names(rows: &[FermentRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.entry.id.clone()).collect()
    }

    fn rows(entries: &[FermentEntry]) -> Vec<FermentRow<'_>> {
        entries
            .iter()
            .map(|e| FermentRow {
                entry: e,
                status: e.status,
            })
            .collect()
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("name".parse::<SortKey>(), Ok(SortKey::desc(Column::FermentName)));
        assert_eq!("weight:asc".parse::<SortKey>(), Ok(SortKey::asc(Column::Weight)));
        assert_eq!("dateEnd:DESC".parse::<SortKey>(), Ok(SortKey::desc(Column::DateEnd)));
        assert!("notes".parse::<SortKey>().is_err());
        assert!("weight:up".parse::<SortKey>().is_err());
        assert!("bogus".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_collect_skips_repeats_and_unsortable() {
        let state: SortingState = [
            SortKey::asc(Column::Status),
            SortKey::desc(Column::Notes),
            SortKey::desc(Column::Status),
            SortKey::desc(Column::Weight),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            state.keys(),
            &[SortKey::asc(Column::Status), SortKey::desc(Column::Weight)]
        );
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("A9", "a10"), Ordering::Less);
        assert_eq!(natural_cmp("b100", "B100"), Ordering::Equal);
        assert_eq!(natural_cmp("kimchi", "Kraut"), Ordering::Less);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Equal);
        assert_eq!(natural_cmp("abc", "ab"), Ordering::Greater);
        assert_eq!(natural_cmp("Active", "Complete"), Ordering::Less);
    }

    #[test]
    fn test_default_is_newest_first() {
        let entries = vec![entry(None, 1.0, 1), entry(None, 1.0, 3), entry(None, 1.0, 2)];
        let mut rows = rows(&entries);
        SortingState::default().apply(&mut rows);
        assert_eq!(names(&rows), vec!["id-3", "id-2", "id-1"]);
    }

    #[test]
    fn test_numeric_sort() {
        let entries = vec![entry(None, 100.0, 1), entry(None, 9.0, 2), entry(None, 1000.0, 3)];
        let mut rows = rows(&entries);
        SortingState::by(SortKey::asc(Column::Weight)).apply(&mut rows);
        assert_eq!(names(&rows), vec!["id-2", "id-1", "id-3"]);
    }

    #[test]
    fn test_missing_values_sort_last_both_ways() {
        let entries = vec![
            entry(None, 1.0, 1),
            entry(Some("b2"), 1.0, 2),
            entry(Some("B10"), 1.0, 3),
        ];

        let mut asc = rows(&entries);
        SortingState::by(SortKey::asc(Column::FermentName)).apply(&mut asc);
        assert_eq!(names(&asc), vec!["id-2", "id-3", "id-1"]);

        let mut desc = rows(&entries);
        SortingState::by(SortKey::desc(Column::FermentName)).apply(&mut desc);
        assert_eq!(names(&desc), vec!["id-3", "id-2", "id-1"]);
    }

    #[test]
    fn test_multi_key_and_stability() {
        let mut entries = vec![
            entry(Some("same"), 2.0, 1),
            entry(Some("same"), 1.0, 2),
            entry(Some("other"), 5.0, 3),
            entry(Some("same"), 1.0, 4),
        ];
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        entries[0] = entries[0].clone().with_dates(start, end, start);

        let mut state = SortingState::unsorted();
        state.toggle_multi(Column::FermentName);
        state.toggle_multi(Column::FermentName);
        state.toggle_multi(Column::Weight);
        state.toggle_multi(Column::Weight);
        assert_eq!(
            state.keys(),
            &[SortKey::asc(Column::FermentName), SortKey::asc(Column::Weight)]
        );

        let mut rows = rows(&entries);
        state.apply(&mut rows);
        // id-2 and id-4 tie on both keys and keep their original order.
        assert_eq!(names(&rows), vec!["id-3", "id-2", "id-4", "id-1"]);
    }

    #[test]
    fn test_status_sort_uses_row_status() {
        let entries = vec![
            entry(None, 1.0, 1).with_status(FermentStatus::Planned),
            entry(None, 1.0, 2),
            entry(None, 1.0, 3).with_status(FermentStatus::Active),
        ];
        let mut rows = rows(&entries);
        SortingState::by(SortKey::asc(Column::Status)).apply(&mut rows);
        assert_eq!(names(&rows), vec!["id-3", "id-1", "id-2"]);
    }

    #[test]
    fn test_toggle_cycle() {
        let mut state = SortingState::default();
        state.toggle(Column::Weight);
        assert_eq!(state.keys(), &[SortKey::desc(Column::Weight)]);
        state.toggle(Column::Weight);
        assert_eq!(state.keys(), &[SortKey::asc(Column::Weight)]);
        state.toggle(Column::Weight);
        assert!(state.is_empty());

        state.toggle(Column::Notes);
        assert!(state.is_empty());
    }

    #[test]
    fn test_toggle_multi_removes_after_ascending() {
        let mut state = SortingState::default();
        state.toggle_multi(Column::DateCreated);
        assert_eq!(state.keys(), &[SortKey::asc(Column::DateCreated)]);
        state.toggle_multi(Column::DateCreated);
        assert!(state.is_empty());
    }

    #[test]
    fn test_by_unsortable_column() {
        assert!(SortingState::by(SortKey::asc(Column::Tags)).is_empty());
    }
}
