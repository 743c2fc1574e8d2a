// Transport adapter - First paint plus a self-healing push subscription
use crate::application::call_feed::{CallFeed, FeedEvent};
use crate::domain::call::CallSnapshot;
use chrono::Local;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

pub struct TransportAdapter {
    feed: Arc<dyn CallFeed>,
    reconnect_delay: Duration,
    tx: mpsc::Sender<FeedEvent>,
}

/// Owns the running subscription task. Aborting it cancels whichever step is
/// pending, including a reconnect delay, and drops the stream.
pub struct TransportHandle {
    task: JoinHandle<()>,
}

impl TransportHandle {
    pub fn teardown(self) {
        self.task.abort();
    }
}

impl TransportAdapter {
    pub fn new(
        feed: Arc<dyn CallFeed>,
        reconnect_delay: Duration,
        tx: mpsc::Sender<FeedEvent>,
    ) -> Self {
        Self {
            feed,
            reconnect_delay,
            tx,
        }
    }

    pub fn spawn(self) -> TransportHandle {
        TransportHandle {
            task: tokio::spawn(self.run()),
        }
    }

    /// Runs until the receiving side goes away. The reconnect delay is awaited
    /// inline, so there is never more than one reconnect outstanding.
    pub async fn run(self) {
        if let Some(snapshot) = self.first_paint().await {
            if self.tx.send(FeedEvent::Snapshot(snapshot)).await.is_err() {
                return;
            }
        }

        loop {
            match self.feed.subscribe().await {
                Ok(mut stream) => {
                    tracing::info!("Subscribed to push stream");
                    while let Some(event) = stream.next().await {
                        if self.tx.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    if self.tx.send(FeedEvent::StreamError(e)).await.is_err() {
                        return;
                    }
                }
            }

            tracing::info!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "Attempting to reconnect push stream"
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Pull the call list, then the count, and stamp them with the local
    /// time. Either failure skips first paint; the next push fills in.
    pub async fn first_paint(&self) -> Option<CallSnapshot> {
        let calls = match self.feed.fetch_calls().await {
            Ok(calls) => calls,
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching calls");
                return None;
            }
        };

        let count = match self.feed.fetch_call_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Error fetching call count");
                return None;
            }
        };

        Some(CallSnapshot::new(calls, count, Some(Local::now().to_rfc3339())))
    }
}
