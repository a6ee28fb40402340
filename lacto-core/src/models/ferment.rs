use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::status::FermentStatus;
use super::tags::TagSet;
use crate::config::StatusPolicy;
use crate::format::{format_date, format_percent, format_quantity};
use crate::salt::salt_required;
use crate::time;

/// One fermentation batch in the log.
///
/// `salt_required` and `status` are computed when the entry is created
/// and stored as-is afterwards; they are never recomputed on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FermentEntry {
    pub id: String,
    /// Combined weight of food and brine.
    pub weight: f64,
    pub unit: String,
    pub brine_percentage: f64,
    pub salt_required: f64,
    /// Missing on entries exported by older versions.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "created_millis")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ferment_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "TagSet::is_empty")]
    pub tags: TagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FermentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_notification: Option<bool>,
}

impl FermentEntry {
    /// Creates an undated entry with a fresh id and computed salt.
    ///
    /// `created_at` is kept to millisecond precision, the precision of
    /// the stored format.
    pub fn new(
        weight: f64,
        unit: impl Into<String>,
        brine_percentage: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            weight,
            unit: unit.into(),
            brine_percentage,
            salt_required: salt_required(Some(weight), Some(brine_percentage)),
            date_created: Some(created_at.trunc_subsecs(3)),
            ferment_name: None,
            notes: None,
            tags: TagSet::new(),
            status: None,
            date_start: None,
            date_end: None,
            send_notification: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.ferment_name = Some(name.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the date range and snapshots the status as of `today`.
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Self {
        self.date_start = Some(start);
        self.date_end = Some(end);
        self.status = Some(time::status_between(start, end, today));
        self
    }

    pub fn with_status(mut self, status: FermentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_notification(mut self, send: bool) -> Self {
        self.send_notification = Some(send);
        self
    }

    /// Name shown to people; falls back to a generic label.
    pub fn display_name(&self) -> &str {
        match self.ferment_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Unnamed ferment",
        }
    }

    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.date_start?, self.date_end?))
    }

    /// Total inclusive length, e.g. `"1 week and 3 days"`.
    pub fn duration(&self) -> Option<String> {
        let (start, end) = self.dates()?;
        time::duration_between(start, end)
    }

    pub fn remaining(&self, today: NaiveDate) -> Option<String> {
        let (start, end) = self.dates()?;
        time::remaining_between(start, end, today)
    }

    /// Status derived from the dates as of `today`, ignoring the stored snapshot.
    pub fn derived_status(&self, today: NaiveDate) -> Option<FermentStatus> {
        let (start, end) = self.dates()?;
        Some(time::status_between(start, end, today))
    }

    /// Status used for filtering, sorting and display under `policy`.
    pub fn effective_status(&self, policy: StatusPolicy, today: NaiveDate) -> Option<FermentStatus> {
        match policy {
            StatusPolicy::Snapshot => self.status,
            StatusPolicy::Live => self.derived_status(today),
        }
    }

    pub fn wants_reminder(&self) -> bool {
        self.send_notification == Some(true) && self.date_end.is_some()
    }
}

impl fmt::Display for FermentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.display_name();
        writeln!(f, "{}", name)?;
        writeln!(f, "{}", "=".repeat(name.chars().count()))?;
        writeln!(f, "ID: {}", self.id)?;

        if let Some(status) = self.status {
            writeln!(f, "Status: {}", status)?;
        }

        writeln!(f, "Salt brine: {}", format_percent(self.brine_percentage))?;
        writeln!(f, "Weight: {}", format_quantity(self.weight, &self.unit))?;
        writeln!(
            f,
            "Salt required: {}",
            format_quantity(self.salt_required, &self.unit)
        )?;

        if let Some((start, end)) = self.dates() {
            write!(f, "Dates: {} - {}", format_date(start), format_date(end))?;
            match self.duration() {
                Some(duration) => writeln!(f, " ({})", duration)?,
                None => writeln!(f)?,
            }
        }

        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().collect();
            writeln!(f, "Tags: {}", tags.join(", "))?;
        }

        if let Some(notes) = &self.notes {
            if !notes.is_empty() {
                writeln!(f, "\nNotes: {}", notes)?;
            }
        }

        Ok(())
    }
}

/// RFC 3339 UTC timestamps with millisecond precision (`2024-01-01T12:00:00.000Z`).
mod created_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<DateTime<Utc>>::deserialize(deserializer)
    }
}
