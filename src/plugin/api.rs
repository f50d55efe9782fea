//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Core plugin management
pub use crate::plugin::manager::{LoadReport, PluginManager, PluginManagerConfig};

// Plugin trait and metadata
pub use crate::plugin::traits::Plugin;
pub use crate::plugin::types::{PluginDescriptor, PluginFactory, PluginInfo, PluginKey, PluginSource};

// Error handling
pub use crate::plugin::error::{PluginError, PluginResult};

// Resolution and activation
pub use crate::plugin::registry::{ActivationRecord, ActivationRegistry};
pub use crate::plugin::resolver::{
    CycleDetection, DependencyResolver, FailedActivation, ResolutionReport, StalledCandidate,
};
pub use crate::plugin::scanner::{CandidateScanner, ScanOutcome};

// Discovery
pub use crate::plugin::discovery::{
    get_default_plugin_path, DiscoveryConfig, DiscoveryOutcome, ModuleLoader, PluginDiscovery,
    UnsupportedModuleLoader, PLUGIN_DIR_NAME,
};

// Builtin registration
pub use crate::plugin::builtin::api::{get_all_builtin_plugins, BuiltinPluginEntry};
pub use crate::plugin::builtin::commands::CorePlugin;
pub use crate::plugin::builtin::console::ConsoleClientPlugin;
