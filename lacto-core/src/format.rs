//! Display formatting for quantities, percentages and dates.
//!
//! Output follows a fixed en-US style: `,` grouping, `.` decimal point
//! and trailing fractional zeros dropped.

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::UnitKind;

/// Fraction digits shown for plain numbers and custom units.
pub const NUMBER_FRACTION_DIGITS: usize = 2;

/// Fraction digits shown for brine percentages.
pub const PERCENT_FRACTION_DIGITS: usize = 1;

/// Formats `value` with grouping and at most `max_fraction_digits` decimals.
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let rounded = round_half_away(value.abs(), max_fraction_digits);
    let fixed = format!("{:.*}", max_fraction_digits, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let is_zero = int_part.chars().all(|c| c == '0') && frac_part.is_empty();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Rounds to `digits` decimals with ties going away from zero.
fn round_half_away(value: f64, digits: usize) -> f64 {
    let factor = 10_f64.powi(digits.min(15) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Formats an amount in the unit it was weighed in.
///
/// Grams, ounces and pounds (and their aliases) are rounded to whole
/// numbers with a short symbol; any other unit keeps its own label.
pub fn format_quantity(value: f64, unit: &str) -> String {
    match UnitKind::of(unit).symbol() {
        Some(symbol) => format!("{} {}", format_number(value, 0), symbol),
        None => format!("{} {}", format_number(value, NUMBER_FRACTION_DIGITS), unit),
    }
}

/// Formats a brine strength given in percent (`2.2` renders as `2.2%`).
pub fn format_percent(percentage: f64) -> String {
    format!("{}%", format_number(percentage, PERCENT_FRACTION_DIGITS))
}

/// `Jan 1, 2024`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Jan 1, 2024, 12:00 PM`
pub fn format_date_time(at: NaiveDateTime) -> String {
    at.format("%b %-d, %Y, %-I:%M %p").to_string()
}
