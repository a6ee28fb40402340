use chrono::NaiveDate;
use clap::Args;
use lacto_core::format::{format_number, format_percent, format_quantity};
use lacto_core::salt::{
    brine_fill_ratio, is_typical_brine, spoon_measure, BRINE_PRESETS, DEFAULT_BRINE,
    TYPICAL_BRINE_RANGE,
};
use lacto_core::time::DateRangePreset;
use lacto_core::{FermentDraft, Unit};
use serde::Serialize;

use super::{resolve_dates, OutputFormat};

#[derive(Args)]
pub struct CalcCommand {
    /// Combined weight of food and water
    #[arg(long, short, required_unless_present = "presets")]
    weight: Option<f64>,

    /// Brine strength in percent
    #[arg(long, short, default_value_t = DEFAULT_BRINE.percentage)]
    brine: f64,

    /// Unit the weight is measured in (grams, ounces or any custom unit)
    #[arg(long, short, default_value = "grams")]
    unit: Unit,

    /// Start date (YYYY-MM-DD); defaults to today when a preset is given
    #[arg(long)]
    start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "preset")]
    end: Option<String>,

    /// Date range preset (one-week, two-weeks, one-month)
    #[arg(long)]
    preset: Option<DateRangePreset>,

    /// List the suggested brine strengths instead
    #[arg(long)]
    presets: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct CalcReport {
    weight: f64,
    unit: String,
    brine_percentage: f64,
    salt_required: f64,
    typical_brine: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    teaspoons: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tablespoons: Option<f64>,
    brine_fill_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<String>,
}

impl CalcCommand {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.presets {
            return self.print_presets();
        }

        let weight = self.weight.ok_or("--weight is required")?;
        let mut draft = FermentDraft::new(weight, self.unit.clone(), self.brine);
        if let Some((start, end)) = self.date_range()? {
            draft.date_start = Some(start);
            draft.date_end = Some(end);
        }

        let salt = draft.salt_required();
        let spoons = spoon_measure(salt, self.unit.label());
        let report = CalcReport {
            weight,
            unit: self.unit.label().to_string(),
            brine_percentage: self.brine,
            salt_required: salt,
            typical_brine: is_typical_brine(self.brine),
            teaspoons: spoons.map(|s| s.teaspoons),
            tablespoons: spoons.map(|s| s.tablespoons),
            brine_fill_ratio: brine_fill_ratio(Some(self.brine)),
            duration: draft.duration(),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => {
                println!(
                    "Salt required: {}",
                    format_quantity(report.salt_required, &report.unit)
                );
                println!(
                    "  for {} at {} brine",
                    format_quantity(weight, &report.unit),
                    format_percent(self.brine)
                );
                if let (Some(tsp), Some(tbsp)) = (report.teaspoons, report.tablespoons) {
                    println!(
                        "  about {} tsp or {} tbsp",
                        format_number(tsp, 1),
                        format_number(tbsp, 1)
                    );
                }
                if !report.typical_brine {
                    println!(
                        "Note: {} is outside the usual {}-{}% range",
                        format_percent(self.brine),
                        TYPICAL_BRINE_RANGE.start(),
                        TYPICAL_BRINE_RANGE.end()
                    );
                }
                if let Some(duration) = &report.duration {
                    println!("Duration: {}", duration);
                }
            }
        }
        Ok(())
    }

    fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>, String> {
        resolve_dates(self.start.as_deref(), self.end.as_deref(), self.preset)
    }

    fn print_presets(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&BRINE_PRESETS)?),
            OutputFormat::Text => {
                println!("Brine presets");
                println!("=============\n");
                for preset in BRINE_PRESETS {
                    let marker = if preset == DEFAULT_BRINE { " (default)" } else { "" };
                    println!(
                        "{:>5}  {}{}",
                        format_percent(preset.percentage),
                        preset.suited_for,
                        marker
                    );
                }
            }
        }
        Ok(())
    }
}
