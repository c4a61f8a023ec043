use crate::types::FirmwareRecord;

// ---------------------------------------------------------------------------
// Filterable columns
// ---------------------------------------------------------------------------

/// Columns that carry a search dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterColumn {
    Version,
    SecVersion,
    Signature,
    Type,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 4] = [
        FilterColumn::Version,
        FilterColumn::SecVersion,
        FilterColumn::Signature,
        FilterColumn::Type,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::Version => 0,
            Self::SecVersion => 1,
            Self::Signature => 2,
            Self::Type => 3,
        }
    }

    /// Previous column, wrapping from the first to the last.
    pub fn prev(self) -> Self {
        let n = Self::ALL.len();
        Self::ALL[(self.index() + n - 1) % n]
    }

    /// Next column, wrapping from the last to the first.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Version => "Version",
            Self::SecVersion => "Security Version",
            Self::Signature => "Signature",
            Self::Type => "Type",
        }
    }

    /// Does `record` satisfy `query` for this column?
    ///
    /// - Version, Signature: case-insensitive substring.
    /// - SecVersion: the string form starts with `query`.
    /// - Type: substring of the whole download URL, not just the extension.
    ///
    /// A record lacking the inspected field never matches.
    pub fn matches(self, query: &str, record: &FirmwareRecord) -> bool {
        match self {
            Self::Version => contains_ignore_case(&record.firmware_version, query),
            Self::Signature => contains_ignore_case(&record.signature, query),
            Self::SecVersion => record
                .sec_version
                .as_deref()
                .is_some_and(|s| s.starts_with(query)),
            Self::Type => record
                .download_url
                .as_deref()
                .is_some_and(|url| url.contains(query)),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Committed query for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnFilter {
    pub query: Option<String>,
    /// Drives header highlighting.
    pub active: bool,
}

/// Per-column committed queries for one table instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    columns: [ColumnFilter; 4],
}

impl FilterState {
    pub fn get(&self, column: FilterColumn) -> &ColumnFilter {
        &self.columns[column.index()]
    }

    pub fn query(&self, column: FilterColumn) -> Option<&str> {
        self.get(column).query.as_deref()
    }

    /// Store `query` for `column`. An empty query clears the column.
    pub fn commit(&mut self, column: FilterColumn, query: &str) {
        if query.is_empty() {
            self.reset(column);
            return;
        }
        self.columns[column.index()] = ColumnFilter {
            query: Some(query.to_owned()),
            active: true,
        };
    }

    pub fn reset(&mut self, column: FilterColumn) {
        self.columns[column.index()] = ColumnFilter::default();
    }

    pub fn clear_all(&mut self) {
        self.columns = Default::default();
    }

    pub fn any_active(&self) -> bool {
        self.columns.iter().any(|c| c.active)
    }

    /// True when every present query accepts the record.
    pub fn passes(&self, record: &FirmwareRecord) -> bool {
        FilterColumn::ALL
            .iter()
            .all(|&col| self.query(col).is_none_or(|q| col.matches(q, record)))
    }

    /// Indices of passing records, in dataset order.
    pub fn apply(&self, records: &[FirmwareRecord]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.passes(r))
            .map(|(i, _)| i)
            .collect()
    }

    /// Short human summary, e.g. `type~bin sec^2`.
    pub fn summary(&self) -> String {
        FilterColumn::ALL
            .iter()
            .filter_map(|&col| {
                self.query(col).map(|q| {
                    let op = if col == FilterColumn::SecVersion { '^' } else { '~' };
                    format!("{}{op}{q}", short_name(col))
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn short_name(column: FilterColumn) -> &'static str {
    match column {
        FilterColumn::Version => "ver",
        FilterColumn::SecVersion => "sec",
        FilterColumn::Signature => "sig",
        FilterColumn::Type => "type",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(signature: &str, version: &str, sec: Option<&str>, url: Option<&str>) -> FirmwareRecord {
        FirmwareRecord {
            firmware_date: "2024-01-01".to_owned(),
            firmware_version: version.to_owned(),
            sec_version: sec.map(str::to_owned),
            signature: signature.to_owned(),
            md5: String::new(),
            download_url: url.map(str::to_owned),
        }
    }

    #[test]
    fn column_focus_steps_and_wraps() {
        assert_eq!(FilterColumn::Version.next(), FilterColumn::SecVersion);
        assert_eq!(FilterColumn::Type.next(), FilterColumn::Version);
        assert_eq!(FilterColumn::Version.prev(), FilterColumn::Type);
        assert_eq!(FilterColumn::Signature.prev(), FilterColumn::SecVersion);
        for col in FilterColumn::ALL {
            assert_eq!(col.next().prev(), col);
        }
    }

    #[test]
    fn version_is_case_insensitive() {
        let r = rec("s", "Release-2.1B", None, None);
        for q in ["release", "RELEASE", "2.1b", "2.1B"] {
            assert!(FilterColumn::Version.matches(q, &r), "query {q}");
        }
        assert_eq!(
            FilterColumn::Version.matches("rel", &r),
            FilterColumn::Version.matches(&"rel".to_uppercase(), &r)
        );
    }

    #[test]
    fn signature_is_case_insensitive_substring() {
        let r = rec("AbCdEf01", "", None, None);
        assert!(FilterColumn::Signature.matches("cdef", &r));
        assert!(!FilterColumn::Signature.matches("xyz", &r));
    }

    #[test]
    fn sec_version_is_prefix_not_substring() {
        let twenty = rec("a", "", Some("20"), None);
        let twelve = rec("b", "", Some("12"), None);
        assert!(FilterColumn::SecVersion.matches("2", &twenty));
        assert!(!FilterColumn::SecVersion.matches("2", &twelve));
    }

    #[test]
    fn missing_fields_fail_their_predicate_only() {
        let r = rec("a", "1.0", None, None);
        assert!(!FilterColumn::SecVersion.matches("1", &r));
        assert!(!FilterColumn::Type.matches("bin", &r));
        assert!(FilterColumn::Version.matches("1.0", &r));
    }

    #[test]
    fn type_matches_whole_url() {
        let records = vec![
            rec("a", "", None, Some("x.bin")),
            rec("b", "", None, Some("y.zip")),
        ];
        let mut state = FilterState::default();
        state.commit(FilterColumn::Type, "bin");
        assert_eq!(state.apply(&records), vec![0]);

        let in_path = rec("c", "", None, Some("https://cdn/bin/fw.zip"));
        assert!(FilterColumn::Type.matches("bin", &in_path));
    }

    #[test]
    fn all_present_queries_must_pass() {
        let records = vec![
            rec("a", "v1", Some("20"), Some("a.bin")),
            rec("b", "v1", Some("31"), Some("b.bin")),
            rec("c", "v2", Some("21"), Some("c.bin")),
        ];
        let mut state = FilterState::default();
        state.commit(FilterColumn::Version, "V1");
        state.commit(FilterColumn::SecVersion, "2");
        assert_eq!(state.apply(&records), vec![0]);
    }

    #[test]
    fn empty_state_passes_everything() {
        let records = vec![rec("a", "", None, None), rec("b", "", None, None)];
        assert_eq!(FilterState::default().apply(&records), vec![0, 1]);
    }

    #[test]
    fn reset_restores_unfiltered_view() {
        let records = vec![
            rec("a", "", None, Some("x.bin")),
            rec("b", "", None, Some("y.zip")),
        ];
        let mut state = FilterState::default();
        let before = state.apply(&records);
        state.commit(FilterColumn::Type, "zip");
        assert_eq!(state.apply(&records), vec![1]);
        state.reset(FilterColumn::Type);
        assert_eq!(state.apply(&records), before);
        state.reset(FilterColumn::Type);
        assert_eq!(state.apply(&records), before);
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn commit_sets_active_and_empty_clears() {
        let mut state = FilterState::default();
        state.commit(FilterColumn::Signature, "ab");
        assert!(state.get(FilterColumn::Signature).active);
        assert!(state.any_active());
        state.commit(FilterColumn::Signature, "");
        assert_eq!(state.query(FilterColumn::Signature), None);
        assert!(!state.any_active());
    }

    #[test]
    fn summary_lists_present_queries() {
        let mut state = FilterState::default();
        state.commit(FilterColumn::Type, "bin");
        state.commit(FilterColumn::SecVersion, "2");
        assert_eq!(state.summary(), "sec^2 type~bin");
    }
}
