//! Host Subsystems
//!
//! The registries plugins populate during startup, the context handed to
//! them, configuration, and the driver that walks the startup stages.

pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod context;
pub(crate) mod driver;
pub(crate) mod registry;
pub(crate) mod wrappers;

pub mod api;
