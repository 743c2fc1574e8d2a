// HTTP call feed - pulls and subscribes to the harness's dashboard API
use crate::application::call_feed::{CallFeed, FeedError, FeedEvent, SnapshotStream};
use crate::domain::call::{calls_from_value, integer, CallRecord, CallSnapshot};
use crate::infrastructure::sse::SseDecoder;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const CALLS_PATH: &str = "/api/calls";
pub const CALL_COUNT_PATH: &str = "/api/call_count";
pub const STREAM_PATH: &str = "/api/stream";
const LAST_EVENT_ID: &str = "Last-Event-ID";

#[derive(Debug, Clone)]
pub struct HttpCallFeed {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    /// Resent on resubscribe so the server can resume, as browsers do.
    last_event_id: Arc<Mutex<Option<String>>>,
}

impl HttpCallFeed {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, FeedError> {
        // No overall timeout on the client: the push stream stays open indefinitely.
        let client = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout,
            last_event_id: Arc::new(Mutex::new(None)),
        })
    }

    fn last_event_id(&self) -> Option<String> {
        self.last_event_id.lock().ok().and_then(|id| id.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CallFeed for HttpCallFeed {
    async fn fetch_calls(&self) -> Result<Vec<CallRecord>, FeedError> {
        let value: Value = self.get_json(CALLS_PATH).await?;
        Ok(calls_from_value(&value))
    }

    async fn fetch_call_count(&self) -> Result<i64, FeedError> {
        let value: Value = self.get_json(CALL_COUNT_PATH).await?;
        Ok(value.get("count").and_then(integer).unwrap_or(0))
    }

    async fn subscribe(&self) -> Result<SnapshotStream, FeedError> {
        let url = self.url(STREAM_PATH);
        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(id) = self.last_event_id() {
            request = request.header(LAST_EVENT_ID, id);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let mut body = Box::pin(response.bytes_stream());
        let last_event_id = self.last_event_id.clone();
        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            loop {
                match body.next().await {
                    Some(Ok(chunk)) => {
                        for event in decoder.feed(&chunk) {
                            if let (Some(id), Ok(mut last)) = (&event.id, last_event_id.lock()) {
                                *last = Some(id.clone());
                            }
                            if !event.is_message() {
                                tracing::trace!(event = %event.event, "Ignoring non-message stream event");
                                continue;
                            }
                            match CallSnapshot::from_json(&event.data) {
                                Ok(snapshot) => yield FeedEvent::Snapshot(snapshot),
                                Err(e) => {
                                    tracing::warn!(error = %e, "Dropping undecodable stream message");
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        yield FeedEvent::StreamError(FeedError::Http(e));
                        break;
                    }
                    None => {
                        yield FeedEvent::StreamError(FeedError::StreamClosed);
                        break;
                    }
                }
            }
        };

        Ok(stream.boxed())
    }
}
