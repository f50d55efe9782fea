pub mod app;
pub mod core;
pub mod host;
pub mod notifications;
pub mod plugin;
