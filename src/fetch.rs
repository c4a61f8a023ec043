use std::time::Duration;

use crate::types::{Dataset, FetchError};

// ---------------------------------------------------------------------------
// Request key
// ---------------------------------------------------------------------------

/// Options passed along with a catalog request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub timeout: Option<Duration>,
    pub headers: Vec<(String, String)>,
}

/// Identifies one retrieval: a new key means a new fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub endpoint: String,
    pub options: RequestOptions,
}

impl FetchRequest {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// A fetch the caller must now perform. Its outcome goes back through
/// [`DatasetFetcher::resolve`] tagged with `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: FetchRequest,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Loading,
    Success,
    Error(FetchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The outcome belonged to a superseded request and was dropped.
    Stale,
}

/// Owns the dataset lifecycle for one table.
///
/// Every issued ticket bumps the generation; only the outcome carrying the
/// latest generation is committed, whatever order outcomes arrive in.
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    key: Option<FetchRequest>,
    generation: u64,
    status: FetchStatus,
    data: Dataset,
}

impl Default for DatasetFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetFetcher {
    pub fn new() -> Self {
        Self {
            key: None,
            generation: 0,
            status: FetchStatus::Loading,
            data: Dataset::default(),
        }
    }

    /// Ask for `request`. Issues a ticket only when the key differs from the
    /// last one issued.
    pub fn request(&mut self, request: FetchRequest) -> Option<FetchTicket> {
        if self.key.as_ref() == Some(&request) {
            return None;
        }
        self.key = Some(request);
        self.issue()
    }

    /// Fetch the current key again.
    pub fn refetch(&mut self) -> Option<FetchTicket> {
        self.key.as_ref()?;
        self.issue()
    }

    fn issue(&mut self) -> Option<FetchTicket> {
        let request = self.key.clone()?;
        self.generation += 1;
        self.status = FetchStatus::Loading;
        tracing::debug!(
            "fetcher: issuing generation {} for {}",
            self.generation,
            request.endpoint
        );
        Some(FetchTicket {
            generation: self.generation,
            request,
        })
    }

    /// Commit the outcome of the fetch tagged `generation`.
    ///
    /// On error the dataset becomes empty.
    pub fn resolve(
        &mut self,
        generation: u64,
        outcome: Result<Dataset, FetchError>,
    ) -> Resolution {
        if generation != self.generation || self.status != FetchStatus::Loading {
            tracing::debug!(
                "fetcher: dropping stale generation {generation} (latest {})",
                self.generation
            );
            return Resolution::Stale;
        }
        match outcome {
            Ok(data) => {
                tracing::debug!("fetcher: generation {generation} loaded {} records", data.len());
                self.data = data;
                self.status = FetchStatus::Success;
            }
            Err(e) => {
                tracing::debug!("fetcher: generation {generation} failed: {e}");
                self.data = Dataset::default();
                self.status = FetchStatus::Error(e);
            }
        }
        Resolution::Applied
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    /// Latest committed dataset. Empty after an error; while a reload is in
    /// flight this is still the previous dataset.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> Option<&FetchRequest> {
        self.key.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FirmwareRecord;

    fn dataset(signatures: &[&str]) -> Dataset {
        Dataset::from_records(signatures.iter().map(|s| FirmwareRecord {
            firmware_date: "2024-01-01".to_owned(),
            firmware_version: "1".to_owned(),
            sec_version: None,
            signature: (*s).to_owned(),
            md5: String::new(),
            download_url: None,
        }))
    }

    fn signatures(f: &DatasetFetcher) -> Vec<&str> {
        f.data()
            .records()
            .iter()
            .map(|r| r.signature.as_str())
            .collect()
    }

    #[test]
    fn starts_loading_and_empty() {
        let f = DatasetFetcher::new();
        assert!(f.is_loading());
        assert!(f.data().is_empty());
    }

    #[test]
    fn one_fetch_per_key() {
        let mut f = DatasetFetcher::new();
        assert!(f.request(FetchRequest::new("/a.json")).is_some());
        assert!(f.request(FetchRequest::new("/a.json")).is_none());
        let opts = RequestOptions {
            timeout: Some(Duration::from_secs(3)),
            headers: vec![],
        };
        assert!(
            f.request(FetchRequest::new("/a.json").with_options(opts))
                .is_some()
        );
    }

    #[test]
    fn success_commits_data() {
        let mut f = DatasetFetcher::new();
        let t = f.request(FetchRequest::new("/a.json")).unwrap();
        assert_eq!(f.resolve(t.generation, Ok(dataset(&["x"]))), Resolution::Applied);
        assert_eq!(f.status(), &FetchStatus::Success);
        assert_eq!(signatures(&f), vec!["x"]);
    }

    #[test]
    fn error_resolves_to_empty_data() {
        let mut f = DatasetFetcher::new();
        let t = f.request(FetchRequest::new("/a.json")).unwrap();
        f.resolve(t.generation, Ok(dataset(&["x"])));
        let t = f.refetch().unwrap();
        assert_eq!(signatures(&f), vec!["x"], "previous data kept while loading");
        f.resolve(t.generation, Err(FetchError::Status(500)));
        assert_eq!(f.status(), &FetchStatus::Error(FetchError::Status(500)));
        assert!(f.data().is_empty());
    }

    #[test]
    fn superseded_response_is_dropped() {
        let mut f = DatasetFetcher::new();
        let a = f.request(FetchRequest::new("/a.json")).unwrap();
        let b = f.request(FetchRequest::new("/b.json")).unwrap();

        assert_eq!(f.resolve(b.generation, Ok(dataset(&["from-b"]))), Resolution::Applied);
        assert_eq!(f.resolve(a.generation, Ok(dataset(&["from-a"]))), Resolution::Stale);
        assert_eq!(signatures(&f), vec!["from-b"]);
    }

    #[test]
    fn stale_error_does_not_clear_newer_data() {
        let mut f = DatasetFetcher::new();
        let a = f.request(FetchRequest::new("/a.json")).unwrap();
        let b = f.refetch().unwrap();
        f.resolve(b.generation, Ok(dataset(&["fresh"])));
        assert_eq!(
            f.resolve(a.generation, Err(FetchError::Retrieval("timeout".into()))),
            Resolution::Stale
        );
        assert_eq!(f.status(), &FetchStatus::Success);
        assert_eq!(signatures(&f), vec!["fresh"]);
    }

    #[test]
    fn duplicate_resolution_is_ignored() {
        let mut f = DatasetFetcher::new();
        let t = f.request(FetchRequest::new("/a.json")).unwrap();
        f.resolve(t.generation, Ok(dataset(&["x"])));
        assert_eq!(f.resolve(t.generation, Ok(dataset(&["y"]))), Resolution::Stale);
        assert_eq!(signatures(&f), vec!["x"]);
    }

    #[test]
    fn refetch_without_key_is_noop() {
        let mut f = DatasetFetcher::new();
        assert!(f.refetch().is_none());
        assert_eq!(f.generation(), 0);
    }
}
