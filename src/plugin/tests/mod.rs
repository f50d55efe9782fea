//! Test modules for the plugin system

pub(crate) mod utils;
