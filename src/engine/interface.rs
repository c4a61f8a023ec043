use std::sync::mpsc::Sender;

use crate::fetch::FetchTicket;
use crate::types::{Dataset, FetchError};

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }

    /// Start the retrieval described by `ticket`.
    pub fn fetch(&self, ticket: FetchTicket, reply_tx: &Sender<Event>) {
        self.send(Request::FetchFirmware {
            ticket,
            reply_tx: reply_tx.clone(),
        });
    }
}

/// Trait implemented by both `HttpEngine` and `StubEngine`.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// All operations the UI layer can send to the engine.
pub enum Request {
    /// Retrieve the catalog. Requests run concurrently, so replies may come
    /// back in any order; each carries its ticket's generation.
    FetchFirmware {
        ticket: FetchTicket,
        reply_tx: Sender<Event>,
    },
    Shutdown,
}

/// All events the engine can push back to the UI.
#[derive(Debug)]
pub enum Event {
    FirmwareFetched { generation: u64, dataset: Dataset },
    FetchFailed { generation: u64, error: FetchError },
}

impl Event {
    pub fn generation(&self) -> u64 {
        match self {
            Self::FirmwareFetched { generation, .. } | Self::FetchFailed { generation, .. } => {
                *generation
            }
        }
    }

    pub fn from_outcome(generation: u64, outcome: Result<Dataset, FetchError>) -> Self {
        match outcome {
            Ok(dataset) => Self::FirmwareFetched {
                generation,
                dataset,
            },
            Err(error) => Self::FetchFailed { generation, error },
        }
    }

    pub fn into_outcome(self) -> (u64, Result<Dataset, FetchError>) {
        match self {
            Self::FirmwareFetched {
                generation,
                dataset,
            } => (generation, Ok(dataset)),
            Self::FetchFailed { generation, error } => (generation, Err(error)),
        }
    }
}
