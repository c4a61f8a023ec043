use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::{Dataset, FetchError};

use super::interface::{Engine, EngineHandle, Event, Request};

/// Canned reply for one endpoint.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub outcome: Result<Dataset, FetchError>,
    /// Simulated latency before the reply is sent.
    pub delay: Duration,
}

impl StubResponse {
    pub fn ok(dataset: Dataset) -> Self {
        Self {
            outcome: Ok(dataset),
            delay: Duration::ZERO,
        }
    }

    pub fn err(error: FetchError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A stub engine that serves pre-loaded fixture data without any network calls.
///
/// Endpoints without a canned response answer with HTTP 404.
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    pub responses: HashMap<String, StubResponse>,
}

impl StubEngine {
    pub fn with(mut self, endpoint: impl Into<String>, response: StubResponse) -> Self {
        self.responses.insert(endpoint.into(), response);
        self
    }
}

impl Engine for StubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("stub tokio runtime");
            rt.block_on(self.run_loop(rx));
        });
        EngineHandle::new(tx)
    }
}

impl StubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchFirmware { ticket, reply_tx } => {
                    let response = self
                        .responses
                        .get(&ticket.request.endpoint)
                        .cloned()
                        .unwrap_or_else(|| StubResponse::err(FetchError::Status(404)));
                    tokio::spawn(async move {
                        if !response.delay.is_zero() {
                            tokio::time::sleep(response.delay).await;
                        }
                        let _ = reply_tx.send(Event::from_outcome(ticket.generation, response.outcome));
                    });
                }
                Request::Shutdown => break,
            }
        }
    }
}
