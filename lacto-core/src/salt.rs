//! Salt calculation for a brine of a given strength.

use serde::Serialize;

use crate::models::UnitKind;

/// Brine strengths considered typical for lacto-fermentation, in percent.
pub const TYPICAL_BRINE_RANGE: std::ops::RangeInclusive<f64> = 2.0..=10.0;

/// Salt needed for `weight` (food plus water) at `brine_percentage`.
///
/// Missing inputs count as zero; refusing incomplete input is the
/// caller's job. The result is kept at full precision.
pub fn salt_required(weight: Option<f64>, brine_percentage: Option<f64>) -> f64 {
    weight.unwrap_or(0.0) * brine_percentage.unwrap_or(0.0) / 100.0
}

/// True when the percentage sits inside [`TYPICAL_BRINE_RANGE`].
pub fn is_typical_brine(brine_percentage: f64) -> bool {
    TYPICAL_BRINE_RANGE.contains(&brine_percentage)
}

/// A suggested brine strength with the produce it suits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrinePreset {
    pub percentage: f64,
    pub suited_for: &'static str,
}

pub const BRINE_PRESETS: [BrinePreset; 5] = [
    BrinePreset {
        percentage: 2.2,
        suited_for: "Green beans, cabbage, carrots, beets, cauliflower, potatoes, tomatoes",
    },
    BrinePreset {
        percentage: 3.0,
        suited_for: "Cucumbers, garlic, okra",
    },
    BrinePreset {
        percentage: 4.0,
        suited_for: "Peppers (spicy/sweet)",
    },
    BrinePreset {
        percentage: 5.0,
        suited_for: "Onions, radishes",
    },
    BrinePreset {
        percentage: 10.0,
        suited_for: "Olives",
    },
];

/// Preset selected when nothing else is chosen.
pub const DEFAULT_BRINE: BrinePreset = BRINE_PRESETS[0];

/// Rough kitchen-spoon equivalent of an amount of salt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpoonMeasure {
    pub teaspoons: f64,
    pub tablespoons: f64,
}

/// Spoon equivalent for gram or ounce amounts.
///
/// Other units, and amounts that are not positive, have no estimate.
pub fn spoon_measure(salt: f64, unit: &str) -> Option<SpoonMeasure> {
    if salt <= 0.0 || !salt.is_finite() {
        return None;
    }
    let (per_tsp, per_tbsp) = match UnitKind::of(unit) {
        UnitKind::Gram => (6.0, 18.0),
        UnitKind::Ounce => (0.21, 0.63),
        UnitKind::Pound | UnitKind::Custom => return None,
    };
    Some(SpoonMeasure {
        teaspoons: salt / per_tsp,
        tablespoons: salt / per_tbsp,
    })
}

/// Share of a jar drawn as brine for a given strength, between 0 and 1.
pub fn brine_fill_ratio(brine_percentage: Option<f64>) -> f64 {
    match brine_percentage {
        Some(p) if p > 0.0 => (p / 12.0).min(1.0),
        _ => 0.0,
    }
}
