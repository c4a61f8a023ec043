use std::collections::BTreeSet;

use crate::sort::{SortDirection, compare_sec_version_strs};
use crate::types::FirmwareRecord;

/// Distinct values offered by the per-column filter menus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    /// Highest security version first; non-numeric spellings trail.
    pub sec_versions: Vec<String>,
    /// File types, ascending.
    pub types: Vec<String>,
}

/// Derive the facet menus from a dataset. Blank values are dropped.
pub fn facets(records: &[FirmwareRecord]) -> FacetSet {
    let mut sec_versions: Vec<String> = records
        .iter()
        .filter_map(|r| r.sec_version.as_deref())
        .filter(|s| !s.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect();
    sec_versions.sort_by(|a, b| compare_sec_version_strs(a, b, SortDirection::Descending));

    let types: Vec<String> = records
        .iter()
        .filter_map(FirmwareRecord::file_type)
        .filter(|t| !t.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect();

    FacetSet {
        sec_versions,
        types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(signature: &str, sec: Option<&str>, url: Option<&str>) -> FirmwareRecord {
        FirmwareRecord {
            firmware_date: String::new(),
            firmware_version: String::new(),
            sec_version: sec.map(str::to_owned),
            signature: signature.to_owned(),
            md5: String::new(),
            download_url: url.map(str::to_owned),
        }
    }

    fn sample() -> Vec<FirmwareRecord> {
        vec![
            rec("a", Some("2"), Some("https://x/fw-a.bin")),
            rec("b", Some("10"), Some("https://x/fw-b.zip")),
            rec("c", Some("2"), Some("https://x/fw-c.bin")),
            rec("d", Some(""), Some("https://x/readme")),
            rec("e", None, None),
            rec("f", Some("9"), Some("https://x/fw-f.img")),
        ]
    }

    #[test]
    fn sec_versions_distinct_descending_numeric() {
        let f = facets(&sample());
        assert_eq!(f.sec_versions, vec!["10", "9", "2"]);
    }

    #[test]
    fn numeric_wire_values_feed_the_menu() {
        let json = br#"[
            {"signature":"a","secVersion":0},
            {"signature":"b","secVersion":"3"},
            {"signature":"c","secVersion":1.50}
        ]"#;
        let dataset = crate::types::Dataset::from_json_slice(json).unwrap();
        let f = facets(dataset.records());
        assert_eq!(f.sec_versions, vec!["3", "1.50"]);
    }

    #[test]
    fn types_distinct_ascending() {
        let f = facets(&sample());
        assert_eq!(f.types, vec!["bin", "img", "zip"]);
    }

    #[test]
    fn no_blank_or_duplicate_values() {
        let f = facets(&sample());
        for list in [&f.sec_versions, &f.types] {
            assert!(list.iter().all(|v| !v.is_empty()));
            let mut dedup = list.clone();
            dedup.dedup();
            assert_eq!(&dedup, list);
        }
    }

    #[test]
    fn non_numeric_sec_versions_trail() {
        let records = vec![
            rec("a", Some("rc1"), None),
            rec("b", Some("3"), None),
            rec("c", Some("alpha"), None),
        ];
        assert_eq!(facets(&records).sec_versions, vec!["3", "alpha", "rc1"]);
    }

    #[test]
    fn idempotent_and_order_independent() {
        let records = sample();
        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(facets(&records), facets(&records));
        assert_eq!(facets(&records), facets(&reversed));
    }

    #[test]
    fn empty_dataset_has_empty_facets() {
        assert_eq!(facets(&[]), FacetSet::default());
    }
}
