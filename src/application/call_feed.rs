// Feed trait for the harness's call data
use crate::domain::call::{CallRecord, CallSnapshot};
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("stream closed by server")]
    StreamClosed,
}

/// The two kinds of message the push channel delivers.
#[derive(Debug)]
pub enum FeedEvent {
    Snapshot(CallSnapshot),
    StreamError(FeedError),
}

/// Ends after the first `StreamError`.
pub type SnapshotStream = BoxStream<'static, FeedEvent>;

#[async_trait]
pub trait CallFeed: Send + Sync {
    /// Active calls, for first paint
    async fn fetch_calls(&self) -> Result<Vec<CallRecord>, FeedError>;

    /// Active call count, for first paint
    async fn fetch_call_count(&self) -> Result<i64, FeedError>;

    /// Open the push channel
    async fn subscribe(&self) -> Result<SnapshotStream, FeedError>;
}
