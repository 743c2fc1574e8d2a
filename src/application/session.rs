// Dashboard session - wires the transport to the reconciler and owns both tasks
use crate::application::call_feed::CallFeed;
use crate::application::dashboard_service::DashboardService;
use crate::application::state::DashboardState;
use crate::application::transport::{TransportAdapter, TransportHandle};
use crate::domain::dashboard::DashboardView;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub struct DashboardSession {
    transport: TransportHandle,
    reconciler: JoinHandle<DashboardState>,
    views: watch::Receiver<DashboardView>,
}

impl DashboardSession {
    pub fn start(feed: Arc<dyn CallFeed>, reconnect_delay: Duration, channel_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(channel_capacity);
        let (service, views) = DashboardService::new(DashboardState::init());

        let reconciler = tokio::spawn(service.run(rx));
        let transport = TransportAdapter::new(feed, reconnect_delay, tx).spawn();

        Self {
            transport,
            reconciler,
            views,
        }
    }

    pub fn views(&self) -> watch::Receiver<DashboardView> {
        self.views.clone()
    }

    /// Stop the subscription, let the reconciler drain what was already
    /// queued, and hand back the final state.
    pub async fn teardown(self) -> Option<DashboardState> {
        self.transport.teardown();
        match self.reconciler.await {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::error!(error = %e, "Reconciler task failed");
                None
            }
        }
    }
}
