use thiserror::Error;

/// Why a catalog retrieval produced no dataset.
///
/// `Retrieval` and `Status` are transport failures; `Parse` means the body
/// arrived but was not a JSON array. The UI treats all three the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    #[error("endpoint answered with HTTP {0}")]
    Status(u16),
    #[error("response is not a firmware list: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}
