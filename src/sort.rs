use std::cmp::Ordering;

use crate::types::{FirmwareRecord, parse_sec_version};

// ---------------------------------------------------------------------------
// Sort keys and orders
// ---------------------------------------------------------------------------

/// Columns the user can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    FirmwareDate,
    SecVersion,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::FirmwareDate => "Build Date",
            Self::SecVersion => "Security Version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "\u{25b2}",
            Self::Descending => "\u{25bc}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    /// Most recent build first.
    pub const DEFAULT: Self = Self {
        key: SortKey::FirmwareDate,
        direction: SortDirection::Descending,
    };

    pub fn compare(self, a: &FirmwareRecord, b: &FirmwareRecord) -> Ordering {
        match self.key {
            SortKey::FirmwareDate => compare_dates(a, b, self.direction),
            SortKey::SecVersion => compare_sec_versions(a, b, self.direction),
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Comparators
// ---------------------------------------------------------------------------

/// Order two optional keys. Missing keys sort after present ones in either
/// direction, so a flip never brings garbage to the top.
fn compare_present<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(cmp(&a, &b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_dates(a: &FirmwareRecord, b: &FirmwareRecord, direction: SortDirection) -> Ordering {
    compare_present(a.parsed_date(), b.parsed_date(), direction, Ord::cmp)
}

pub fn compare_sec_versions(
    a: &FirmwareRecord,
    b: &FirmwareRecord,
    direction: SortDirection,
) -> Ordering {
    compare_present(
        a.sec_version_number(),
        b.sec_version_number(),
        direction,
        f64::total_cmp,
    )
}

/// Order raw security-version strings: numeric value first, then the text
/// itself so distinct spellings of one number ("3", "3.0") stay ordered.
pub(crate) fn compare_sec_version_strs(a: &str, b: &str, direction: SortDirection) -> Ordering {
    compare_present(
        parse_sec_version(a),
        parse_sec_version(b),
        direction,
        f64::total_cmp,
    )
    .then_with(|| a.cmp(b))
}

/// Sort dataset indices in place. Stable: equal keys keep dataset order.
pub fn sort_indices(records: &[FirmwareRecord], indices: &mut [usize], order: SortOrder) {
    indices.sort_by(|&i, &j| match (records.get(i), records.get(j)) {
        (Some(a), Some(b)) => order.compare(a, b),
        _ => Ordering::Equal,
    });
}

// ---------------------------------------------------------------------------
// User sort state
// ---------------------------------------------------------------------------

/// The user's chosen ordering, if any. Falls back to `SortOrder::DEFAULT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    user: Option<SortOrder>,
}

impl SortState {
    /// Header-click cycle: ascending → descending → default ordering.
    /// Selecting a different key starts over at ascending.
    pub fn cycle(&mut self, key: SortKey) {
        self.user = match self.user {
            Some(SortOrder {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => Some(SortOrder {
                key,
                direction: SortDirection::Descending,
            }),
            Some(SortOrder {
                key: current,
                direction: SortDirection::Descending,
            }) if current == key => None,
            _ => Some(SortOrder {
                key,
                direction: SortDirection::Ascending,
            }),
        };
    }

    pub fn effective(self) -> SortOrder {
        self.user.unwrap_or_default()
    }

    pub fn user(self) -> Option<SortOrder> {
        self.user
    }

    pub fn clear(&mut self) {
        self.user = None;
    }

    /// A state with `order` already chosen.
    pub fn chosen(order: SortOrder) -> Self {
        Self { user: Some(order) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(signature: &str, date: &str, sec: Option<&str>) -> FirmwareRecord {
        FirmwareRecord {
            firmware_date: date.to_owned(),
            firmware_version: String::new(),
            sec_version: sec.map(str::to_owned),
            signature: signature.to_owned(),
            md5: String::new(),
            download_url: None,
        }
    }

    fn order_of(records: &[FirmwareRecord], order: SortOrder) -> Vec<&str> {
        let mut idx: Vec<usize> = (0..records.len()).collect();
        sort_indices(records, &mut idx, order);
        idx.iter().map(|&i| records[i].signature.as_str()).collect()
    }

    #[test]
    fn default_order_is_newest_first() {
        let records = vec![
            rec("old", "2023-01-01", None),
            rec("new", "2024-06-01", None),
        ];
        assert_eq!(order_of(&records, SortOrder::default()), vec!["new", "old"]);
    }

    #[test]
    fn date_ascending() {
        let records = vec![
            rec("b", "2024-06-01", None),
            rec("a", "2023-01-01", None),
            rec("c", "2025-02-10", None),
        ];
        let order = SortOrder {
            key: SortKey::FirmwareDate,
            direction: SortDirection::Ascending,
        };
        assert_eq!(order_of(&records, order), vec!["a", "b", "c"]);
    }

    #[test]
    fn sec_version_is_numeric_not_lexical() {
        let records = vec![
            rec("nine", "", Some("9")),
            rec("ten", "", Some("10")),
            rec("two", "", Some("2")),
        ];
        let asc = SortOrder {
            key: SortKey::SecVersion,
            direction: SortDirection::Ascending,
        };
        assert_eq!(order_of(&records, asc), vec!["two", "nine", "ten"]);
        let desc = SortOrder {
            direction: SortDirection::Descending,
            ..asc
        };
        assert_eq!(order_of(&records, desc), vec!["ten", "nine", "two"]);
    }

    #[test]
    fn non_numeric_sec_version_sinks_in_both_directions() {
        let records = vec![
            rec("junk", "", Some("beta")),
            rec("none", "", None),
            rec("one", "", Some("1")),
            rec("five", "", Some("5")),
        ];
        let asc = SortOrder {
            key: SortKey::SecVersion,
            direction: SortDirection::Ascending,
        };
        assert_eq!(order_of(&records, asc), vec!["one", "five", "junk", "none"]);
        let desc = SortOrder {
            direction: SortDirection::Descending,
            ..asc
        };
        assert_eq!(order_of(&records, desc), vec!["five", "one", "junk", "none"]);
    }

    #[test]
    fn unparseable_dates_sink() {
        let records = vec![
            rec("bad", "someday", None),
            rec("ok", "2020-01-01", None),
        ];
        assert_eq!(order_of(&records, SortOrder::default()), vec!["ok", "bad"]);
    }

    #[test]
    fn cycle_asc_desc_default() {
        let mut state = SortState::default();
        assert_eq!(state.effective(), SortOrder::DEFAULT);

        state.cycle(SortKey::SecVersion);
        assert_eq!(
            state.effective(),
            SortOrder {
                key: SortKey::SecVersion,
                direction: SortDirection::Ascending
            }
        );
        state.cycle(SortKey::SecVersion);
        assert_eq!(state.effective().direction, SortDirection::Descending);
        state.cycle(SortKey::SecVersion);
        assert_eq!(state.user(), None);
        assert_eq!(state.effective(), SortOrder::DEFAULT);
    }

    #[test]
    fn cycle_other_key_starts_ascending() {
        let mut state = SortState::default();
        state.cycle(SortKey::SecVersion);
        state.cycle(SortKey::SecVersion);
        state.cycle(SortKey::FirmwareDate);
        assert_eq!(
            state.effective(),
            SortOrder {
                key: SortKey::FirmwareDate,
                direction: SortDirection::Ascending
            }
        );
    }
}
