// Domain layer - Call data, view models and pure display rules
pub mod call;
pub mod chart;
pub mod dashboard;
pub mod format;
pub mod load;
