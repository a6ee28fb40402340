use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit selected when weighing a ferment.
///
/// Entries store the unit as plain text, so a ferment logged with a
/// custom token keeps that token verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    #[default]
    Grams,
    Ounces,
    Other(String),
}

impl Unit {
    pub fn label(&self) -> &str {
        match self {
            Unit::Grams => "grams",
            Unit::Ounces => "ounces",
            Unit::Other(token) => token,
        }
    }

    pub fn kind(&self) -> UnitKind {
        UnitKind::of(self.label())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.as_str() {
            "grams" => Unit::Grams,
            "ounces" => Unit::Ounces,
            _ => Unit::Other(s),
        }
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Unit::from(s.to_string())
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.label().to_string()
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Unit cannot be empty".to_string());
        }
        Ok(Unit::from(trimmed))
    }
}

/// Display classification of a unit label, recognising common aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    Gram,
    Ounce,
    Pound,
    Custom,
}

impl UnitKind {
    pub fn of(label: &str) -> Self {
        match label {
            "grams" | "gram" | "g" => UnitKind::Gram,
            "ounces" | "ounce" | "oz" => UnitKind::Ounce,
            "pounds" | "pound" | "lbs" | "lb" => UnitKind::Pound,
            _ => UnitKind::Custom,
        }
    }

    /// Short symbol for known units.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            UnitKind::Gram => Some("g"),
            UnitKind::Ounce => Some("oz"),
            UnitKind::Pound => Some("lb"),
            UnitKind::Custom => None,
        }
    }
}
