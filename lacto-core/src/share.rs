//! Plain-text summary for sharing a ferment.

use serde::Serialize;

use crate::format::{format_date, format_percent, format_quantity};
use crate::models::FermentEntry;

pub const SHARE_ATTRIBUTION: &str = "Shared via Lacto-Fermentation Tools (LFT)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSummary {
    pub title: String,
    pub text: String,
}

/// Builds the title and body. Lines for missing or zero values are left
/// out; `site_url` is appended to the attribution line when given.
pub fn share_summary(entry: &FermentEntry, site_url: Option<&str>) -> ShareSummary {
    let title = match entry.ferment_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "My ferment".to_string(),
    };

    let mut text = String::new();
    if let Some(start) = entry.date_start {
        text.push_str(&format!("📅 Started on: {}\n", format_date(start)));
    }
    if entry.salt_required != 0.0 && !entry.unit.is_empty() {
        text.push_str(&format!(
            "🧂 Salt required: {}\n",
            format_quantity(entry.salt_required, &entry.unit)
        ));
    }
    if entry.brine_percentage != 0.0 {
        text.push_str(&format!(
            "💧 Brine percentage: {}\n",
            format_percent(entry.brine_percentage)
        ));
    }
    if !entry.tags.is_empty() {
        let tags: Vec<&str> = entry.tags.iter().collect();
        text.push_str(&format!("🏷️ Tags: {}\n", tags.join(", ")));
    }

    text.push('\n');
    text.push_str(SHARE_ATTRIBUTION);
    if let Some(url) = site_url.filter(|u| !u.is_empty()) {
        text.push_str(" - ");
        text.push_str(url);
    }

    ShareSummary { title, text }
}
