mod calc;
mod config_cmd;
mod data;
mod ferment;

pub use calc::CalcCommand;
pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use ferment::FermentCommand;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use lacto_core::time::{parse_date, DateRangePreset};
use lacto_core::{FermentLedger, FileStore, LedgerError};
use std::io::{self, Write};

use crate::config::Config;

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Opens the file-backed ferment log and reports changes on stderr.
pub fn open_ledger(config: &Config) -> Result<FermentLedger<FileStore>, LedgerError> {
    let store = FileStore::new(config.data_dir.value.clone());
    let mut ledger = FermentLedger::open(store, config.ledger_config())?;
    ledger.subscribe(|event| tracing::info!(event = %event, "Ferment data updated"));
    Ok(ledger)
}

/// Asks a yes/no question on stdout; anything but `y` is a no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Start and end dates from `--start`/`--end` or `--preset`.
///
/// A preset without `--start` begins today. Giving only one of the two
/// explicit dates is an error.
pub fn resolve_dates(
    start: Option<&str>,
    end: Option<&str>,
    preset: Option<DateRangePreset>,
) -> Result<Option<(NaiveDate, NaiveDate)>, String> {
    let start = start.map(parse_date_arg).transpose()?;

    if let Some(preset) = preset {
        let start = start.unwrap_or_else(|| Local::now().date_naive());
        return Ok(preset.range_from(start));
    }

    match (start, end) {
        (Some(start), Some(end)) => Ok(Some((start, parse_date_arg(end)?))),
        (None, None) => Ok(None),
        _ => Err("--start and --end must be given together".to_string()),
    }
}

fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_date(input).ok_or_else(|| format!("Invalid date format '{}'. Use YYYY-MM-DD.", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_explicit_dates() {
        let range = resolve_dates(Some("2024-01-01"), Some("2024-01-10"), None).unwrap();
        assert_eq!(range, Some((date(2024, 1, 1), date(2024, 1, 10))));
        assert_eq!(resolve_dates(None, None, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_preset() {
        let range =
            resolve_dates(Some("2024-01-01"), None, Some(DateRangePreset::OneWeek)).unwrap();
        assert_eq!(range, Some((date(2024, 1, 1), date(2024, 1, 7))));
        assert_eq!(
            resolve_dates(Some("2024-01-01"), None, Some(DateRangePreset::Custom)).unwrap(),
            None
        );
    }

    #[test]
    fn test_resolve_rejects_partial_or_bad_dates() {
        assert!(resolve_dates(Some("2024-01-01"), None, None).is_err());
        assert!(resolve_dates(None, Some("2024-01-01"), None).is_err());
        let err = resolve_dates(Some("01/02/2024"), Some("2024-01-03"), None).unwrap_err();
        assert!(err.contains("01/02/2024"));
    }
}
