// Application state for HTTP handlers
use crate::domain::dashboard::DashboardView;
use tokio::sync::watch;

#[derive(Clone)]
pub struct AppState {
    pub views: watch::Receiver<DashboardView>,
}

impl AppState {
    pub fn current_view(&self) -> DashboardView {
        self.views.borrow().clone()
    }
}
