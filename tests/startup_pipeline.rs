//! Startup pipeline integration tests
//!
//! - `pipeline::ordering` - activation order over registered candidates
//! - `pipeline::modules` - plugin directory discovery with a module loader
//! - `pipeline::stages` - host stage order, counts and the binary settings

mod common;
mod pipeline;
