use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::fetch::FetchRequest;
use crate::types::{Dataset, FetchError};

use super::interface::{Engine, EngineHandle, Event, Request};

/// The real engine: fetches the catalog over HTTP (or from a `file://` URL).
pub struct HttpEngine {
    default_timeout: Duration,
}

impl HttpEngine {
    pub fn new(default_timeout: Duration) -> Self {
        Self { default_timeout }
    }
}

impl Engine for HttpEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let _ = std::thread::Builder::new()
            .name("fw-engine".to_owned())
            .spawn(move || {
                let rt = tokio::runtime::Runtime::new().expect("tokio runtime init");
                rt.block_on(self.run_loop(rx));
            });
        handle
    }
}

impl HttpEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        let client = reqwest::Client::builder()
            .timeout(self.default_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchFirmware { ticket, reply_tx } => {
                    tracing::debug!(
                        "engine: FetchFirmware[{}] {}",
                        ticket.generation,
                        ticket.request.endpoint
                    );
                    let client = client.clone();
                    tokio::spawn(async move {
                        let outcome = fetch_catalog(&client, &ticket.request).await;
                        if let Err(ref e) = outcome {
                            tracing::debug!("engine: FetchFirmware[{}] error: {e}", ticket.generation);
                        }
                        let _ = reply_tx.send(Event::from_outcome(ticket.generation, outcome));
                    });
                }
                Request::Shutdown => {
                    tracing::debug!("engine: shutting down");
                    break;
                }
            }
        }
    }
}

/// Perform one catalog retrieval.
pub async fn fetch_catalog(
    client: &reqwest::Client,
    request: &FetchRequest,
) -> Result<Dataset, FetchError> {
    if let Some(path) = request.endpoint.strip_prefix("file://") {
        let body = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Retrieval(format!("{path}: {e}")))?;
        return Dataset::from_json_slice(&body);
    }

    let mut builder = client.get(&request.endpoint);
    if let Some(timeout) = request.options.timeout {
        builder = builder.timeout(timeout);
    }
    for (name, value) in &request.options.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let resp = builder
        .send()
        .await
        .map_err(|e| FetchError::Retrieval(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    let body = resp
        .bytes()
        .await
        .map_err(|e| FetchError::Retrieval(e.to_string()))?;
    Dataset::from_json_slice(&body)
}
