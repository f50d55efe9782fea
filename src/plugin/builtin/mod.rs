//! Built-in Plugin Implementations
//!
//! Plugins that ship with the host. They register themselves with
//! `builtin_plugin!` and are discovered like any other candidate.

pub mod api;
pub mod console;
pub mod commands;
