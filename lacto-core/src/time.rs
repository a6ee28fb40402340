//! Calendar arithmetic for ferment date ranges.
//!
//! All spans are inclusive of both the start and the end date and are
//! computed on plain calendar dates, so daylight-saving shifts never
//! change a result. "Today" is always supplied by the caller.
//!
//! Durations are rendered using the largest fitting unit:
//!
//! - whole calendar months (`"1 month"`, `"3 months"`), remainder dropped
//! - otherwise weeks plus remaining days (`"1 week and 3 days"`)
//! - otherwise days (`"1 day"`)
//!
//! Spans of zero or fewer inclusive days have no rendering.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::FermentStatus;

/// ISO calendar date format used for stored and user-supplied dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses an ISO `YYYY-MM-DD` date.
///
/// Malformed input is logged and yields `None`; callers treat that as
/// "unknown", never as a failure.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(input.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::error!(input, error = %e, "Invalid date format");
            None
        }
    }
}

/// Number of calendar days from `start` to `end`, counting both ends.
///
/// Zero or negative when `end` is before `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// A positive inclusive span split into whole months and leftover days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub months: u32,
    pub days: u32,
}

impl DateSpan {
    /// Splits the inclusive range `start..=end`.
    ///
    /// Returns `None` when the range holds no days.
    pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        let end_exclusive = end.succ_opt()?;
        if end_exclusive <= start {
            return None;
        }

        let months = whole_months(start, end_exclusive);
        let anchor = start.checked_add_months(Months::new(months))?;
        let days = u32::try_from((end_exclusive - anchor).num_days()).ok()?;

        Some(Self { months, days })
    }

    pub fn weeks(&self) -> u32 {
        self.days / 7
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.months > 0 {
            return f.write_str(&counted(self.months, "month"));
        }

        let weeks = self.weeks();
        let days = self.days % 7;
        match (weeks, days) {
            (0, d) => f.write_str(&counted(d, "day")),
            (w, 0) => f.write_str(&counted(w, "week")),
            (w, d) => write!(f, "{} and {}", counted(w, "week"), counted(d, "day")),
        }
    }
}

/// Largest month count that can be added to `start` without passing `end`.
///
/// Month addition clamps to the last day of shorter months.
fn whole_months(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    while months > 0 {
        match start.checked_add_months(Months::new(months as u32)) {
            Some(date) if date <= end => break,
            _ => months -= 1,
        }
    }
    months.max(0) as u32
}

fn counted(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Human readable length of a ferment, both ends included.
pub fn duration_between(start: NaiveDate, end: NaiveDate) -> Option<String> {
    DateSpan::inclusive(start, end).map(|span| span.to_string())
}

/// Time left from `today` through `end`, inclusive.
///
/// `None` when the ferment has not started yet or has no days left.
pub fn remaining_between(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Option<String> {
    if start > today {
        return None;
    }
    duration_between(today, end)
}

/// Classifies a dated ferment relative to `today`.
///
/// A ferment starting today is already active; one whose end date is
/// today is still active on that last day.
pub fn status_between(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> FermentStatus {
    if start > today {
        FermentStatus::Planned
    } else if inclusive_days(today, end) <= 0 {
        FermentStatus::Complete
    } else {
        FermentStatus::Active
    }
}

/// Inclusive duration between two ISO date strings.
pub fn duration(date_start: &str, date_end: &str) -> Option<String> {
    let start = parse_date(date_start)?;
    let end = parse_date(date_end)?;
    duration_between(start, end)
}

/// Remaining inclusive duration between `today` and an ISO end date.
pub fn remaining_duration(date_start: &str, date_end: &str, today: NaiveDate) -> Option<String> {
    let start = parse_date(date_start)?;
    let end = parse_date(date_end)?;
    remaining_between(start, end, today)
}

/// Status for optional ISO date strings; `None` if either is missing or malformed.
pub fn status(
    date_start: Option<&str>,
    date_end: Option<&str>,
    today: NaiveDate,
) -> Option<FermentStatus> {
    let start = parse_date(date_start?)?;
    let end = parse_date(date_end?)?;
    Some(status_between(start, end, today))
}

/// Quick picks offered when choosing a ferment's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateRangePreset {
    OneWeek,
    TwoWeeks,
    OneMonth,
    Custom,
}

impl DateRangePreset {
    /// Inclusive `(start, end)` range beginning on `start`.
    ///
    /// `Custom` has no derived range.
    pub fn range_from(&self, start: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let end = match self {
            DateRangePreset::OneWeek => start.checked_add_days(chrono::Days::new(6))?,
            DateRangePreset::TwoWeeks => start.checked_add_days(chrono::Days::new(13))?,
            DateRangePreset::OneMonth => start.checked_add_months(Months::new(1))?.pred_opt()?,
            DateRangePreset::Custom => return None,
        };
        Some((start, end))
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateRangePreset::OneWeek => "1 week",
            DateRangePreset::TwoWeeks => "2 weeks",
            DateRangePreset::OneMonth => "1 month",
            DateRangePreset::Custom => "Custom",
        }
    }
}

impl FromStr for DateRangePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-week" | "1w" => Ok(DateRangePreset::OneWeek),
            "two-weeks" | "2w" => Ok(DateRangePreset::TwoWeeks),
            "one-month" | "1m" => Ok(DateRangePreset::OneMonth),
            "custom" => Ok(DateRangePreset::Custom),
            _ => Err(format!(
                "Invalid preset '{}'. Valid options: one-week, two-weeks, one-month, custom",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_duration_single_day() {
        assert_eq!(duration("2024-01-01", "2024-01-01").as_deref(), Some("1 day"));
        assert_eq!(duration("2024-01-01", "2024-01-03").as_deref(), Some("3 days"));
    }

    #[test]
    fn test_duration_weeks() {
        assert_eq!(duration("2024-01-01", "2024-01-07").as_deref(), Some("1 week"));
        assert_eq!(
            duration("2024-01-01", "2024-01-10").as_deref(),
            Some("1 week and 3 days")
        );
        assert_eq!(
            duration("2024-01-01", "2024-01-15").as_deref(),
            Some("2 weeks and 1 day")
        );
        assert_eq!(duration("2024-01-01", "2024-01-14").as_deref(), Some("2 weeks"));
    }

    #[test]
    fn test_duration_months_drop_remainder() {
        assert_eq!(duration("2024-01-01", "2024-02-01").as_deref(), Some("1 month"));
        assert_eq!(duration("2024-01-01", "2024-01-31").as_deref(), Some("1 month"));
        assert_eq!(duration("2024-01-01", "2024-03-20").as_deref(), Some("2 months"));
        assert_eq!(duration("2024-01-01", "2025-01-10").as_deref(), Some("12 months"));
    }

    #[test]
    fn test_duration_month_end_clamping() {
        // Jan 31 + 1 month clamps to Feb 29 in a leap year.
        assert_eq!(duration("2024-01-31", "2024-02-28").as_deref(), Some("1 month"));
        assert_eq!(
            duration("2024-01-31", "2024-02-27").as_deref(),
            Some("4 weeks")
        );
    }

    #[test]
    fn test_duration_whole_february() {
        assert_eq!(duration("2021-02-01", "2021-02-28").as_deref(), Some("1 month"));
        assert_eq!(duration("2021-02-01", "2021-02-27").as_deref(), Some("3 weeks and 6 days"));
        assert_eq!(duration("2024-02-01", "2024-02-28").as_deref(), Some("4 weeks"));
    }

    #[test]
    fn test_duration_reversed_is_absent() {
        assert_eq!(duration("2024-01-10", "2024-01-09"), None);
        assert_eq!(duration("2024-01-10", "2023-12-01"), None);
    }

    #[test]
    fn test_duration_malformed_is_absent() {
        assert_eq!(duration("2024-13-01", "2024-01-09"), None);
        assert_eq!(duration("yesterday", "2024-01-09"), None);
        assert_eq!(duration("2024-01-01", ""), None);
    }

    #[test]
    fn test_duration_across_dst_change() {
        // US and EU clocks move in March; calendar arithmetic is unaffected.
        assert_eq!(duration("2024-03-08", "2024-03-14").as_deref(), Some("1 week"));
        assert_eq!(duration("2024-03-30", "2024-04-01").as_deref(), Some("3 days"));
    }

    #[test]
    fn test_inclusive_days() {
        assert_eq!(inclusive_days(date("2024-01-01"), date("2024-01-01")), 1);
        assert_eq!(inclusive_days(date("2024-01-01"), date("2024-12-31")), 366);
        assert_eq!(inclusive_days(date("2024-01-02"), date("2024-01-01")), 0);
    }

    #[test]
    fn test_date_span_parts() {
        let span = DateSpan::inclusive(date("2024-01-01"), date("2024-02-05")).unwrap();
        assert_eq!(span, DateSpan { months: 1, days: 5 });
        assert_eq!(span.to_string(), "1 month");

        let span = DateSpan::inclusive(date("2024-01-01"), date("2024-01-20")).unwrap();
        assert_eq!(span, DateSpan { months: 0, days: 20 });
        assert_eq!(span.weeks(), 2);
    }

    #[test]
    fn test_remaining_duration() {
        let today = date("2024-01-05");
        assert_eq!(
            remaining_duration("2024-01-01", "2024-01-10", today).as_deref(),
            Some("6 days")
        );
        assert_eq!(
            remaining_duration("2024-01-01", "2024-01-05", today).as_deref(),
            Some("1 day")
        );
        assert_eq!(remaining_duration("2024-01-01", "2024-01-04", today), None);
    }

    #[test]
    fn test_remaining_duration_not_started() {
        let today = date("2024-01-05");
        assert_eq!(remaining_duration("2024-01-06", "2024-01-20", today), None);
        assert_eq!(
            remaining_duration("2024-01-05", "2024-01-20", today).as_deref(),
            Some("2 weeks and 2 days")
        );
    }

    #[test]
    fn test_status_examples() {
        assert_eq!(
            status(Some("2025-01-01"), Some("2025-01-10"), date("2024-12-01")),
            Some(FermentStatus::Planned)
        );
        assert_eq!(
            status(Some("2024-01-01"), Some("2024-01-02"), date("2025-01-01")),
            Some(FermentStatus::Complete)
        );
        assert_eq!(
            status(Some("2024-01-01"), Some("2025-12-31"), date("2025-01-01")),
            Some(FermentStatus::Active)
        );
    }

    #[test]
    fn test_status_boundaries() {
        let today = date("2024-06-15");
        assert_eq!(
            status_between(date("2024-06-15"), date("2024-06-20"), today),
            FermentStatus::Active
        );
        assert_eq!(
            status_between(date("2024-06-16"), date("2024-06-20"), today),
            FermentStatus::Planned
        );
        assert_eq!(
            status_between(date("2024-06-01"), date("2024-06-15"), today),
            FermentStatus::Active
        );
        assert_eq!(
            status_between(date("2024-06-01"), date("2024-06-14"), today),
            FermentStatus::Complete
        );
    }

    #[test]
    fn test_status_missing_dates() {
        let today = date("2024-06-15");
        assert_eq!(status(None, Some("2024-06-20"), today), None);
        assert_eq!(status(Some("2024-06-01"), None, today), None);
        assert_eq!(status(Some("nope"), Some("2024-06-20"), today), None);
    }

    #[test]
    fn test_presets_render_their_label() {
        let start = date("2024-01-01");
        for preset in [
            DateRangePreset::OneWeek,
            DateRangePreset::TwoWeeks,
            DateRangePreset::OneMonth,
        ] {
            let (s, e) = preset.range_from(start).unwrap();
            assert_eq!(duration_between(s, e).as_deref(), Some(preset.label()));
        }
        assert_eq!(DateRangePreset::Custom.range_from(start), None);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(
            "two-weeks".parse::<DateRangePreset>().unwrap(),
            DateRangePreset::TwoWeeks
        );
        assert!("fortnight".parse::<DateRangePreset>().is_err());
    }
}
