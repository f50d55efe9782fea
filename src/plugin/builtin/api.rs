//! Registration of builtin plugins
//!
//! Builtin plugins submit a descriptor factory with the `builtin_plugin!`
//! macro; discovery collects every submission at startup.

use crate::plugin::types::{PluginDescriptor, PluginSource};

/// Entry for a builtin plugin in the static registry
pub struct BuiltinPluginEntry {
    pub descriptor: fn() -> PluginDescriptor,
}

inventory::collect!(BuiltinPluginEntry);

/// Register a builtin plugin descriptor factory
#[macro_export]
macro_rules! builtin_plugin {
    ($descriptor_fn:expr) => {
        inventory::submit!($crate::plugin::builtin::api::BuiltinPluginEntry {
            descriptor: $descriptor_fn
        });
    };
}

/// Get all registered builtin plugins, tagged as builtin, sorted by name
pub fn get_all_builtin_plugins() -> Vec<PluginDescriptor> {
    let mut descriptors: Vec<PluginDescriptor> = inventory::iter::<BuiltinPluginEntry>()
        .map(|entry| (entry.descriptor)().with_source(PluginSource::Builtin))
        .collect();
    // inventory gives no ordering guarantee
    descriptors.sort_by(|a, b| a.name.cmp(&b.name));
    descriptors
}
