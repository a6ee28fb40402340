use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle classification of a ferment relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FermentStatus {
    Planned,
    Active,
    Complete,
}

impl FermentStatus {
    pub const ALL: [FermentStatus; 3] = [
        FermentStatus::Planned,
        FermentStatus::Active,
        FermentStatus::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FermentStatus::Planned => "Planned",
            FermentStatus::Active => "Active",
            FermentStatus::Complete => "Complete",
        }
    }
}

impl fmt::Display for FermentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FermentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "planned" => Ok(FermentStatus::Planned),
            "active" => Ok(FermentStatus::Active),
            "complete" => Ok(FermentStatus::Complete),
            _ => Err(format!(
                "Invalid status '{}'. Valid options: planned, active, complete",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", FermentStatus::Planned), "Planned");
        assert_eq!(format!("{}", FermentStatus::Active), "Active");
        assert_eq!(format!("{}", FermentStatus::Complete), "Complete");
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            FermentStatus::from_str("planned").unwrap(),
            FermentStatus::Planned
        );
        assert_eq!(
            FermentStatus::from_str("ACTIVE").unwrap(),
            FermentStatus::Active
        );
        assert_eq!(
            FermentStatus::from_str(" Complete ").unwrap(),
            FermentStatus::Complete
        );
    }

    #[test]
    fn test_status_from_str_invalid() {
        assert!(FermentStatus::from_str("done").is_err());
        assert!(FermentStatus::from_str("").is_err());
    }

    #[test]
    fn test_status_json_uses_capitalized_names() {
        let json = serde_json::to_string(&FermentStatus::Active).unwrap();
        assert_eq!(json, "\"Active\"");

        let parsed: FermentStatus = serde_json::from_str("\"Planned\"").unwrap();
        assert_eq!(parsed, FermentStatus::Planned);
    }
}
