//! Plugin System Module
//!
//! Discovers plugin candidates, activates them in dependency order and hands
//! the host the triggers that drive the staged startup.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod manager;
pub(crate) mod registry;
pub(crate) mod resolver;
pub(crate) mod scanner;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;

#[cfg(test)]
pub(crate) mod tests;
