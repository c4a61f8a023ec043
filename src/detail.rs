use std::collections::HashSet;

use crate::types::{Dataset, FirmwareRecord};

/// What the expanded row shows under a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDetail {
    pub signature: String,
    pub md5: String,
}

pub fn project(record: &FirmwareRecord) -> RowDetail {
    RowDetail {
        signature: record.signature.clone(),
        md5: record.md5.clone(),
    }
}

/// Rows currently expanded, keyed by signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRows {
    signatures: HashSet<String>,
}

impl ExpandedRows {
    /// Flip the row's expansion. Returns the new state.
    pub fn toggle(&mut self, signature: &str) -> bool {
        if self.signatures.remove(signature) {
            false
        } else {
            self.signatures.insert(signature.to_owned());
            true
        }
    }

    pub fn is_expanded(&self, signature: &str) -> bool {
        self.signatures.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Forget rows that are not in `dataset`.
    pub fn retain_known(&mut self, dataset: &Dataset) {
        let known: HashSet<&str> = dataset
            .records()
            .iter()
            .map(|r| r.signature.as_str())
            .collect();
        self.signatures.retain(|s| known.contains(s.as_str()));
    }
}
