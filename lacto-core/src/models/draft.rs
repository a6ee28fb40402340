use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use thiserror::Error;

use super::ferment::FermentEntry;
use super::tags::{TagError, TagSet};
use super::unit::Unit;
use crate::naming::generate_ferment_name;
use crate::salt::salt_required;
use crate::time;

/// Longest note accepted from the form, in characters.
pub const MAX_NOTES_LEN: usize = 500;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DraftError {
    #[error("Weight is required")]
    MissingWeight,

    #[error("Brine percentage is required")]
    MissingBrine,

    #[error("Weight must be a positive number, got {0}")]
    InvalidWeight(f64),

    #[error("Brine percentage must be a positive number, got {0}")]
    InvalidBrine(f64),

    #[error("Unit cannot be empty")]
    EmptyUnit,

    #[error("Notes are {0} characters long; the limit is {max}", max = MAX_NOTES_LEN)]
    NotesTooLong(usize),

    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Calculator input before it becomes a [`FermentEntry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FermentDraft {
    pub weight: Option<f64>,
    pub unit: Unit,
    pub brine_percentage: Option<f64>,
    pub ferment_name: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub send_notification: bool,
}

impl FermentDraft {
    pub fn new(weight: f64, unit: Unit, brine_percentage: f64) -> Self {
        Self {
            weight: Some(weight),
            unit,
            brine_percentage: Some(brine_percentage),
            ..Self::default()
        }
    }

    /// Live salt figure shown while the form is being filled in.
    pub fn salt_required(&self) -> f64 {
        salt_required(self.weight, self.brine_percentage)
    }

    /// Live duration label for the chosen dates.
    pub fn duration(&self) -> Option<String> {
        time::duration_between(self.date_start?, self.date_end?)
    }

    /// Validates the draft and builds a new entry.
    ///
    /// A blank name is replaced with one not used by `existing`. The
    /// status is only set when both dates are present.
    pub fn assemble<R: Rng + ?Sized>(
        self,
        existing: &[FermentEntry],
        today: NaiveDate,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<FermentEntry, DraftError> {
        let weight = self.weight.ok_or(DraftError::MissingWeight)?;
        if !(weight.is_finite() && weight > 0.0) {
            return Err(DraftError::InvalidWeight(weight));
        }
        let brine = self.brine_percentage.ok_or(DraftError::MissingBrine)?;
        if !(brine.is_finite() && brine > 0.0) {
            return Err(DraftError::InvalidBrine(brine));
        }
        let unit = self.unit.label().trim();
        if unit.is_empty() {
            return Err(DraftError::EmptyUnit);
        }

        let notes = self
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if let Some(notes) = notes {
            let len = notes.chars().count();
            if len > MAX_NOTES_LEN {
                return Err(DraftError::NotesTooLong(len));
            }
        }

        let tags = TagSet::try_from_input(&self.tags)?;

        let mut entry = FermentEntry::new(weight, unit, brine, now).with_tags(tags);

        if let (Some(start), Some(end)) = (self.date_start, self.date_end) {
            if end < start {
                return Err(DraftError::EndBeforeStart { start, end });
            }
            entry = entry
                .with_dates(start, end, today)
                .with_notification(self.send_notification);
        }

        if let Some(notes) = notes {
            entry = entry.with_notes(notes);
        }

        let name = match self.ferment_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let generated = generate_ferment_name(existing, rng);
                tracing::debug!(name = %generated, "Generated ferment name");
                generated
            }
        };

        Ok(entry.with_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FermentStatus;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_assemble_full_draft() {
        let draft = FermentDraft {
            ferment_name: Some("  Sauerkraut ".into()),
            notes: Some("Caraway seeds".into()),
            tags: vec!["cabbage".into(), "classic".into()],
            date_start: Some(date(2024, 1, 1)),
            date_end: Some(date(2024, 1, 10)),
            send_notification: true,
            ..FermentDraft::new(1000.0, Unit::Grams, 2.2)
        };

        let mut rng = StdRng::seed_from_u64(3);
        let entry = draft.assemble(&[], today(), now(), &mut rng).unwrap();

        assert_eq!(entry.ferment_name.as_deref(), Some("Sauerkraut"));
        assert_eq!(entry.salt_required, 22.0);
        assert_eq!(entry.unit, "grams");
        assert_eq!(entry.status, Some(FermentStatus::Active));
        assert_eq!(entry.send_notification, Some(true));
        assert_eq!(entry.notes.as_deref(), Some("Caraway seeds"));
        assert_eq!(entry.tags.len(), 2);
        assert_eq!(entry.date_created, Some(now()));
    }

    #[test]
    fn test_assemble_generates_name_when_blank() {
        let draft = FermentDraft {
            ferment_name: Some("   ".into()),
            ..FermentDraft::new(500.0, Unit::Ounces, 3.0)
        };

        let mut rng = StdRng::seed_from_u64(3);
        let entry = draft.assemble(&[], today(), now(), &mut rng).unwrap();
        let name = entry.ferment_name.unwrap();
        assert_eq!(name.len(), 4);
        assert!(name.starts_with(|c: char| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_assemble_without_dates_has_no_status() {
        let draft = FermentDraft {
            send_notification: true,
            date_start: Some(date(2024, 1, 1)),
            ..FermentDraft::new(500.0, Unit::Other("cups".into()), 3.0)
        };

        let mut rng = StdRng::seed_from_u64(3);
        let entry = draft.assemble(&[], today(), now(), &mut rng).unwrap();
        assert_eq!(entry.status, None);
        assert_eq!(entry.send_notification, None);
        assert_eq!(entry.unit, "cups");
    }

    #[test]
    fn test_assemble_rejects_bad_input() {
        let mut rng = StdRng::seed_from_u64(3);

        let missing = FermentDraft::default();
        assert_eq!(
            missing.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::MissingWeight)
        );

        let negative = FermentDraft::new(-5.0, Unit::Grams, 2.0);
        assert_eq!(
            negative.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::InvalidWeight(-5.0))
        );

        let blank_unit = FermentDraft::new(5.0, Unit::Other(" ".into()), 2.0);
        assert_eq!(
            blank_unit.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::EmptyUnit)
        );

        let reversed = FermentDraft {
            date_start: Some(date(2024, 1, 10)),
            date_end: Some(date(2024, 1, 1)),
            ..FermentDraft::new(5.0, Unit::Grams, 2.0)
        };
        assert!(matches!(
            reversed.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_assemble_enforces_limits() {
        let mut rng = StdRng::seed_from_u64(3);

        let long_notes = FermentDraft {
            notes: Some("x".repeat(MAX_NOTES_LEN + 1)),
            ..FermentDraft::new(5.0, Unit::Grams, 2.0)
        };
        assert_eq!(
            long_notes.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::NotesTooLong(MAX_NOTES_LEN + 1))
        );

        let many_tags = FermentDraft {
            tags: (0..6).map(|i| format!("tag{}", i)).collect(),
            ..FermentDraft::new(5.0, Unit::Grams, 2.0)
        };
        assert_eq!(
            many_tags.assemble(&[], today(), now(), &mut rng),
            Err(DraftError::Tag(TagError::Full))
        );
    }

    #[test]
    fn test_live_figures() {
        let draft = FermentDraft {
            date_start: Some(date(2024, 1, 1)),
            date_end: Some(date(2024, 1, 31)),
            ..FermentDraft::new(1000.0, Unit::Grams, 5.0)
        };
        assert_eq!(draft.salt_required(), 50.0);
        assert_eq!(draft.duration().as_deref(), Some("1 month"));
        assert_eq!(FermentDraft::default().salt_required(), 0.0);
    }
}
