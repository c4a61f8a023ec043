use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::FetchError;

// ---------------------------------------------------------------------------
// FirmwareRecord
// ---------------------------------------------------------------------------

/// One entry of the firmware catalog, as served by the signatures endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareRecord {
    #[serde(default)]
    pub firmware_date: String,
    #[serde(default)]
    pub firmware_version: String,
    /// Nominally a string; some feeds emit a bare JSON number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub sec_version: Option<String>,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub md5: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl FirmwareRecord {
    /// Calendar date of the build, if `firmware_date` parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_firmware_date(&self.firmware_date)
    }

    /// Numeric value of `sec_version`. `None` for missing, blank, or
    /// non-numeric values so callers can sink them deterministically.
    pub fn sec_version_number(&self) -> Option<f64> {
        self.sec_version.as_deref().and_then(parse_sec_version)
    }

    /// File extension of the download URL path (`".../fw.bin?x=1"` → `"bin"`).
    pub fn file_type(&self) -> Option<&str> {
        self.download_url.as_deref().and_then(url_extension)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        // A numeric zero counts as no value; other numbers keep their spelling.
        Some(serde_json::Value::Number(n)) if n.as_f64() == Some(0.0) => None,
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Numeric form of a security version string, if it has one.
pub fn parse_sec_version(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse the date forms seen in catalog feeds.
pub fn parse_firmware_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    None
}

fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext)
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// An ordered, signature-unique list of firmware records from one fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<FirmwareRecord>,
}

impl Dataset {
    /// Build a dataset, keeping the first record for each signature.
    pub fn from_records(records: impl IntoIterator<Item = FirmwareRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|r| {
                if r.signature.is_empty() {
                    tracing::warn!("dataset: dropping record without signature");
                    return false;
                }
                if !seen.insert(r.signature.clone()) {
                    tracing::warn!("dataset: duplicate signature {}", r.signature);
                    return false;
                }
                true
            })
            .collect();
        Self { records }
    }

    /// Decode an endpoint response body.
    ///
    /// The body must be a JSON array. Elements that fail to decode are
    /// skipped rather than failing the whole list.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, FetchError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;
        let serde_json::Value::Array(items) = value else {
            return Err(FetchError::Parse("expected a JSON array".to_owned()));
        };
        let records = items.into_iter().enumerate().filter_map(|(i, item)| {
            match serde_json::from_value::<FirmwareRecord>(item) {
                Ok(r) => Some(r),
                Err(e) => {
                    tracing::warn!("dataset: skipping malformed record #{i}: {e}");
                    None
                }
            }
        });
        Ok(Self::from_records(records))
    }

    pub fn records(&self) -> &[FirmwareRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&FirmwareRecord> {
        self.records.get(idx)
    }
}
