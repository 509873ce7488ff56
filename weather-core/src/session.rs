//! Owned request/response lifecycle for one UI surface.
//!
//! A `WeatherSession` is the single writer of its `LocationInfo`. Requests run
//! on spawned tasks and report back through a channel that only the session
//! drains, so every transition happens on the task that owns the session.
//!
//! Overlapping requests are allowed. Each one gets a monotonically increasing
//! [`RequestId`]; a completion whose id is not the latest issued one is
//! discarded as stale.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    error::CurrentWeatherError,
    location::LocationInfo,
    model::{Coordinate, WeatherSnapshot},
    provider::WeatherProvider,
    transport::Transport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal outcome of one request, tagged with the request that produced it.
#[derive(Debug)]
pub struct Completion {
    pub request_id: RequestId,
    pub outcome: Result<WeatherSnapshot, CurrentWeatherError>,
}

/// Result of feeding a completion to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Stale,
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Arc<WeatherProvider>,
    transport: Arc<dyn Transport>,
    info: LocationInfo,
    next_id: u64,
    pending: Option<RequestId>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
}

impl WeatherSession {
    pub fn new(provider: WeatherProvider, transport: Arc<dyn Transport>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            provider: Arc::new(provider),
            transport,
            info: LocationInfo::Unknown,
            next_id: 0,
            pending: None,
            completions_tx,
            completions_rx,
        }
    }

    pub fn location_info(&self) -> &LocationInfo {
        &self.info
    }

    /// Id of the request whose completion will be applied, if any is outstanding.
    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    /// Move to `Loading(coordinate)` and issue a request in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch(&mut self, coordinate: Coordinate) -> RequestId {
        self.next_id += 1;
        let request_id = RequestId(self.next_id);

        if let Some(previous) = self.pending.replace(request_id) {
            tracing::debug!(%previous, current = %request_id, "request superseded");
        }
        self.info = std::mem::take(&mut self.info).start_loading(coordinate);

        let provider = Arc::clone(&self.provider);
        let transport = Arc::clone(&self.transport);
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let outcome = provider.request_current_weather(transport, coordinate).await;
            // The receiver lives as long as the session; a dropped session has no one to tell.
            let _ = tx.send(Completion { request_id, outcome });
        });

        request_id
    }

    /// Apply a completion, unless a newer request has been issued since.
    pub fn apply(&mut self, completion: Completion) -> Delivery {
        if self.pending != Some(completion.request_id) {
            tracing::debug!(request = %completion.request_id, "discarding stale completion");
            return Delivery::Stale;
        }

        self.pending = None;
        self.info = std::mem::take(&mut self.info).complete(completion.outcome);
        Delivery::Applied
    }

    /// Wait for the next completion of any request, without applying it.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.completions_rx.recv().await
    }

    /// Drain completions until the latest request has been applied.
    pub async fn settle(&mut self) -> &LocationInfo {
        while self.pending.is_some() {
            let Some(completion) = self.completions_rx.recv().await else {
                break;
            };
            self.apply(completion);
        }
        &self.info
    }
}
