// Presentation layer - Rendering collaborators and the local view server
pub mod app_state;
pub mod chart_style;
pub mod handlers;
pub mod render;
