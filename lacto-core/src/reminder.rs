//! When and what to remind about a finishing ferment.
//!
//! Only the decision lives here: delivering the notification is left to
//! whatever front end schedules it.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::FermentEntry;

/// A completion reminder ready to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub ferment_id: String,
    /// Local wall-clock time the reminder is due.
    pub fire_at: NaiveDateTime,
    pub title: String,
    pub body: String,
    /// Replaces any earlier reminder for the same ferment.
    pub tag: String,
}

/// Last second of the end day, local time.
pub fn reminder_time(date_end: NaiveDate) -> Option<NaiveDateTime> {
    date_end.and_hms_opt(23, 59, 59)
}

/// Builds the reminder for an entry that asked for one and has an end date.
pub fn reminder_for(entry: &FermentEntry) -> Option<Reminder> {
    if !entry.wants_reminder() {
        return None;
    }
    let fire_at = reminder_time(entry.date_end?)?;
    let name = entry.ferment_name.as_deref().filter(|n| !n.is_empty());

    Some(Reminder {
        ferment_id: entry.id.clone(),
        fire_at,
        title: name.unwrap_or("Fermentation Complete").to_string(),
        body: format!(
            "Your ferment is ready! {} {} of {} has finished fermenting.",
            entry.weight,
            entry.unit,
            name.unwrap_or("ferment")
        ),
        tag: format!("ferment-{}", entry.id),
    })
}

/// Time left until the reminder is due, or `None` if there is nothing to
/// schedule (not requested, no end date, or already past).
pub fn reminder_delay(entry: &FermentEntry, now: NaiveDateTime) -> Option<Duration> {
    let reminder = reminder_for(entry)?;
    let delay = reminder.fire_at - now;
    (delay > Duration::zero()).then_some(delay)
}

/// Reminders still due after `now`, soonest first.
pub fn upcoming_reminders(entries: &[FermentEntry], now: NaiveDateTime) -> Vec<Reminder> {
    let mut due: Vec<Reminder> = entries
        .iter()
        .filter_map(reminder_for)
        .filter(|r| r.fire_at > now)
        .collect();
    due.sort_by_key(|r| r.fire_at);
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(id: &str, end: NaiveDate) -> FermentEntry {
        FermentEntry::new(1000.0, "grams", 2.2, Utc::now())
            .with_id(id)
            .with_dates(date(2024, 1, 1), end, date(2024, 1, 1))
            .with_notification(true)
    }

    #[test]
    fn test_reminder_payload() {
        let entry = dated("abc", date(2024, 1, 10)).with_name("Kimchi");
        let reminder = reminder_for(&entry).unwrap();

        assert_eq!(reminder.fire_at, date(2024, 1, 10).and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(reminder.title, "Kimchi");
        assert_eq!(
            reminder.body,
            "Your ferment is ready! 1000 grams of Kimchi has finished fermenting."
        );
        assert_eq!(reminder.tag, "ferment-abc");
    }

    #[test]
    fn test_reminder_payload_without_name() {
        let entry = dated("abc", date(2024, 1, 10));
        let reminder = reminder_for(&entry).unwrap();
        assert_eq!(reminder.title, "Fermentation Complete");
        assert!(reminder.body.contains("1000 grams of ferment"));
    }

    #[test]
    fn test_no_reminder_unless_requested() {
        let entry = dated("abc", date(2024, 1, 10)).with_notification(false);
        assert!(reminder_for(&entry).is_none());

        let undated = FermentEntry::new(1.0, "grams", 2.0, Utc::now()).with_notification(true);
        assert!(reminder_for(&undated).is_none());
    }

    #[test]
    fn test_reminder_delay() {
        let entry = dated("abc", date(2024, 1, 10));

        let now = date(2024, 1, 10).and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(reminder_delay(&entry, now), Some(Duration::seconds(59 * 60 + 59)));

        let now = date(2024, 1, 9).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(reminder_delay(&entry, now), Some(Duration::days(1)));

        let at_fire_time = date(2024, 1, 10).and_hms_opt(23, 59, 59).unwrap();
        assert_eq!(reminder_delay(&entry, at_fire_time), None);

        let after = date(2024, 1, 11).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(reminder_delay(&entry, after), None);
    }

    #[test]
    fn test_upcoming_reminders_sorted() {
        let entries = vec![
            dated("late", date(2024, 2, 1)),
            dated("past", date(2024, 1, 2)),
            dated("soon", date(2024, 1, 10)),
        ];
        let now = date(2024, 1, 5).and_hms_opt(9, 0, 0).unwrap();
        let ids: Vec<String> = upcoming_reminders(&entries, now)
            .into_iter()
            .map(|r| r.ferment_id)
            .collect();
        assert_eq!(ids, vec!["soon", "late"]);
    }
}
