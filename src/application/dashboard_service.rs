// Dashboard service - Consumes feed events and publishes reconciled views
use crate::application::call_feed::FeedEvent;
use crate::application::state::DashboardState;
use crate::domain::call::CallSnapshot;
use crate::domain::dashboard::DashboardView;
use tokio::sync::{mpsc, watch};

pub struct DashboardService {
    state: DashboardState,
    views: watch::Sender<DashboardView>,
}

impl DashboardService {
    pub fn new(state: DashboardState) -> (Self, watch::Receiver<DashboardView>) {
        let (views, rx) = watch::channel(state.view());
        (Self { state, views }, rx)
    }

    /// Reconcile one snapshot and redraw every subscribed view.
    pub fn apply(&mut self, snapshot: &CallSnapshot) -> DashboardView {
        let view = self.state.reconcile(snapshot);
        self.views.send_replace(view.clone());
        view
    }

    /// Single consumer loop. Events are handled strictly in arrival order and
    /// each reconciliation completes before the next receive.
    pub async fn run(mut self, mut rx: mpsc::Receiver<FeedEvent>) -> DashboardState {
        while let Some(event) = rx.recv().await {
            match event {
                FeedEvent::Snapshot(snapshot) => {
                    let view = self.apply(&snapshot);
                    tracing::debug!(
                        count = view.count,
                        previous = ?self.state.last_count(),
                        calls = view.calls.len(),
                        load = view.load.label,
                        "Dashboard reconciled"
                    );
                }
                FeedEvent::StreamError(e) => {
                    tracing::warn!(error = %e, "Push stream error");
                }
            }
        }

        tracing::debug!("Feed channel closed, reconciler stopping");
        self.state
    }
}
