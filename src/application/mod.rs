// Application layer - Reconciliation and transport orchestration
pub mod call_feed;
pub mod dashboard_service;
pub mod state;
pub mod session;
pub mod transport;
