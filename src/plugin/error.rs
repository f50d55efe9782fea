//! Plugin Error Handling
//!
//! Error types for discovery, candidacy checks, activation and the staged
//! startup triggers.

use crate::notifications::api::NotificationError;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Plugin not found among candidates or active plugins
    #[error("Plugin not found: {plugin_name}")]
    PluginNotFound { plugin_name: String },

    /// Plugin API version incompatible with the host
    #[error("Version incompatible: {message}")]
    VersionIncompatible { message: String },

    /// A module file could not be loaded into the process
    #[error("Failed to load module '{module}': {cause}")]
    LoadError { module: String, cause: String },

    /// Constructing a plugin instance failed
    #[error("Failed to instantiate plugin '{plugin_name}': {cause}")]
    InstantiationFailed { plugin_name: String, cause: String },

    /// A plugin hook failed
    #[error("Plugin '{plugin_name}' failed during '{operation}': {cause}")]
    ExecutionError {
        plugin_name: String,
        operation: String,
        cause: String,
    },

    /// A plugin type was already activated in this run
    #[error("Plugin '{plugin_name}' is already active")]
    AlreadyActive { plugin_name: String },

    /// Two discovered descriptors share the same plugin type
    #[error("Plugin '{plugin_name}' was discovered more than once")]
    DuplicateCandidate { plugin_name: String },

    /// Startup triggers called out of their fixed order
    #[error("Startup stage '{attempted}' cannot run after '{current}'")]
    StageOrder { current: String, attempted: String },

    /// Plugin directory walk failed
    #[error("Plugin discovery failed: {message}")]
    Discovery { message: String },

    #[error(transparent)]
    Notification(#[from] NotificationError),
}

impl crate::core::error_handling::ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, PluginError::Discovery { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            PluginError::Discovery { message } => Some(message),
            _ => None,
        }
    }
}
