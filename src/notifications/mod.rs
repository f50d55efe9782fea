//! Lifecycle event bus
//!
//! Typed, ordered, multi-listener delivery of the host's startup stages.

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod manager;
pub(crate) mod traits;

// Public API module - the only public interface for the event bus
pub mod api;

#[cfg(test)]
mod tests;
