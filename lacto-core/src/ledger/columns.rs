//! Columns of the ferment table and which of them fit a given width.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::sort::SortKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// Condensed column holding the whole entry, used on narrow screens.
    #[serde(rename = "narrowViewCol")]
    NarrowView,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "dateCreated")]
    DateCreated,
    #[serde(rename = "fermentName")]
    FermentName,
    #[serde(rename = "brinePercentage")]
    BrinePercentage,
    #[serde(rename = "weight")]
    Weight,
    #[serde(rename = "saltRequired")]
    SaltRequired,
    #[serde(rename = "dateStart")]
    DateStart,
    #[serde(rename = "dateEnd")]
    DateEnd,
    #[serde(rename = "colTotalDuration")]
    TotalDuration,
    #[serde(rename = "colRemainingDuration")]
    RemainingDuration,
    #[serde(rename = "notes")]
    Notes,
    #[serde(rename = "tags")]
    Tags,
    #[serde(rename = "actions")]
    Actions,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::NarrowView,
        Column::Status,
        Column::DateCreated,
        Column::FermentName,
        Column::BrinePercentage,
        Column::Weight,
        Column::SaltRequired,
        Column::DateStart,
        Column::DateEnd,
        Column::TotalDuration,
        Column::RemainingDuration,
        Column::Notes,
        Column::Tags,
        Column::Actions,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Column::NarrowView => "narrowViewCol",
            Column::Status => "status",
            Column::DateCreated => "dateCreated",
            Column::FermentName => "fermentName",
            Column::BrinePercentage => "brinePercentage",
            Column::Weight => "weight",
            Column::SaltRequired => "saltRequired",
            Column::DateStart => "dateStart",
            Column::DateEnd => "dateEnd",
            Column::TotalDuration => "colTotalDuration",
            Column::RemainingDuration => "colRemainingDuration",
            Column::Notes => "notes",
            Column::Tags => "tags",
            Column::Actions => "actions",
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            Column::NarrowView => "Ferment",
            Column::Status => "Status",
            Column::DateCreated => "Created",
            Column::FermentName => "Name",
            Column::BrinePercentage => "Brine",
            Column::Weight => "Weight",
            Column::SaltRequired => "Salt",
            Column::DateStart => "Start",
            Column::DateEnd => "End",
            Column::TotalDuration => "Duration",
            Column::RemainingDuration => "Remaining",
            Column::Notes => "Notes",
            Column::Tags => "Tags",
            Column::Actions => "Actions",
        }
    }

    /// Comparator used when sorting by this column, if it is sortable.
    ///
    /// The remaining-duration column sorts by end date.
    pub fn sort_kind(&self) -> Option<SortKind> {
        match self {
            Column::Status | Column::FermentName => Some(SortKind::Alphanumeric),
            Column::BrinePercentage | Column::Weight | Column::SaltRequired => {
                Some(SortKind::Numeric)
            }
            Column::DateCreated
            | Column::DateStart
            | Column::DateEnd
            | Column::RemainingDuration => Some(SortKind::DateTime),
            Column::NarrowView
            | Column::TotalDuration
            | Column::Notes
            | Column::Tags
            | Column::Actions => None,
        }
    }

    pub fn is_sortable(&self) -> bool {
        self.sort_kind().is_some()
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Accepts column ids, case-insensitively, plus a few short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let alias = match wanted.as_str() {
            "name" => Some(Column::FermentName),
            "created" => Some(Column::DateCreated),
            "brine" => Some(Column::BrinePercentage),
            "salt" => Some(Column::SaltRequired),
            "start" => Some(Column::DateStart),
            "end" => Some(Column::DateEnd),
            "duration" => Some(Column::TotalDuration),
            "remaining" => Some(Column::RemainingDuration),
            _ => None,
        };
        alias
            .or_else(|| {
                Column::ALL
                    .into_iter()
                    .find(|c| c.id().to_lowercase() == wanted)
            })
            .ok_or_else(|| format!("Unknown column '{}'", s))
    }
}

/// Width ranges the table layout switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Below 800
    Narrow,
    /// 800 to 1299
    Compact,
    /// 1300 to 1599
    Medium,
    /// 1600 and up
    Wide,
}

impl Breakpoint {
    pub fn for_width(width: u32) -> Self {
        if width >= 1600 {
            Breakpoint::Wide
        } else if width >= 1300 {
            Breakpoint::Medium
        } else if width >= 800 {
            Breakpoint::Compact
        } else {
            Breakpoint::Narrow
        }
    }
}

/// Visibility flag for every [`Column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnVisibility([bool; 14]);

#[rustfmt::skip]
impl ColumnVisibility {
    //                        narrow status created name brine weight salt start end total remain notes tags actions
    const WIDE: [bool; 14] = [false, true, true, true, true, true, true, true, true, true, true, true, true, true];
    const MEDIUM: [bool; 14] = [false, true, true, true, false, false, false, true, true, true, false, false, true, true];
    const COMPACT: [bool; 14] = [false, true, false, true, false, false, false, true, false, false, false, false, true, true];
    const NARROW: [bool; 14] = [true, false, false, false, false, false, false, false, false, false, false, false, false, true];
}

impl ColumnVisibility {
    pub fn for_width(width: u32) -> Self {
        Self::for_breakpoint(Breakpoint::for_width(width))
    }

    pub fn for_breakpoint(breakpoint: Breakpoint) -> Self {
        match breakpoint {
            Breakpoint::Wide => Self(Self::WIDE),
            Breakpoint::Medium => Self(Self::MEDIUM),
            Breakpoint::Compact => Self(Self::COMPACT),
            Breakpoint::Narrow => Self(Self::NARROW),
        }
    }

    pub fn is_visible(&self, column: Column) -> bool {
        self.0[column.index()]
    }

    /// Visible columns in table order.
    pub fn visible(&self) -> impl Iterator<Item = Column> + '_ {
        Column::ALL.into_iter().filter(|c| self.is_visible(*c))
    }

    /// Flags keyed by column id.
    pub fn to_map(&self) -> BTreeMap<&'static str, bool> {
        Column::ALL
            .into_iter()
            .map(|c| (c.id(), self.is_visible(c)))
            .collect()
    }
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        Self::for_breakpoint(Breakpoint::Wide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(width: u32) -> Vec<Column> {
        ColumnVisibility::for_width(width).visible().collect()
    }

    #[test]
    fn test_wide_shows_everything_but_narrow_column() {
        let cols = visible(1600);
        assert_eq!(cols.len(), 13);
        assert!(!cols.contains(&Column::NarrowView));
    }

    #[test]
    fn test_medium_columns() {
        assert_eq!(
            visible(1300),
            vec![
                Column::Status,
                Column::DateCreated,
                Column::FermentName,
                Column::DateStart,
                Column::DateEnd,
                Column::TotalDuration,
                Column::Tags,
                Column::Actions,
            ]
        );
    }

    #[test]
    fn test_compact_columns() {
        assert_eq!(
            visible(800),
            vec![
                Column::Status,
                Column::FermentName,
                Column::DateStart,
                Column::Tags,
                Column::Actions,
            ]
        );
    }

    #[test]
    fn test_narrow_columns() {
        assert_eq!(visible(320), vec![Column::NarrowView, Column::Actions]);
        assert_eq!(visible(0), vec![Column::NarrowView, Column::Actions]);
    }

    #[test]
    fn test_breakpoint_boundaries() {
        assert_eq!(Breakpoint::for_width(799), Breakpoint::Narrow);
        assert_eq!(Breakpoint::for_width(800), Breakpoint::Compact);
        assert_eq!(Breakpoint::for_width(1299), Breakpoint::Compact);
        assert_eq!(Breakpoint::for_width(1300), Breakpoint::Medium);
        assert_eq!(Breakpoint::for_width(1599), Breakpoint::Medium);
        assert_eq!(Breakpoint::for_width(1600), Breakpoint::Wide);
        assert_eq!(Breakpoint::for_width(u32::MAX), Breakpoint::Wide);
    }

    #[test]
    fn test_actions_always_visible() {
        for width in [0, 799, 800, 1299, 1300, 1599, 1600, 4000] {
            assert!(ColumnVisibility::for_width(width).is_visible(Column::Actions));
        }
    }

    #[test]
    fn test_to_map_uses_ids() {
        let map = ColumnVisibility::for_width(500).to_map();
        assert_eq!(map.len(), 14);
        assert!(map["narrowViewCol"]);
        assert!(!map["colTotalDuration"]);
    }

    #[test]
    fn test_sortable_columns() {
        let unsortable: Vec<Column> = Column::ALL
            .into_iter()
            .filter(|c| !c.is_sortable())
            .collect();
        assert_eq!(
            unsortable,
            vec![
                Column::NarrowView,
                Column::TotalDuration,
                Column::Notes,
                Column::Tags,
                Column::Actions,
            ]
        );
        assert_eq!(Column::Weight.sort_kind(), Some(SortKind::Numeric));
        assert_eq!(Column::Status.sort_kind(), Some(SortKind::Alphanumeric));
    }

    #[test]
    fn test_column_parse() {
        assert_eq!("fermentName".parse::<Column>().unwrap(), Column::FermentName);
        assert_eq!("DATECREATED".parse::<Column>().unwrap(), Column::DateCreated);
        assert_eq!("salt".parse::<Column>().unwrap(), Column::SaltRequired);
        assert_eq!(
            "colRemainingDuration".parse::<Column>().unwrap(),
            Column::RemainingDuration
        );
        assert!("color".parse::<Column>().is_err());
    }

    #[test]
    fn test_column_json_id() {
        let json = serde_json::to_string(&Column::TotalDuration).unwrap();
        assert_eq!(json, "\"colTotalDuration\"");
    }
}
