//! Plugin Discovery
//!
//! Collects plugin descriptors from two places:
//!
//! - builtin plugins registered with the `builtin_plugin!` macro, and
//! - module files under the plugin directory, matched by extension and
//!   searched recursively, each handed to a [`ModuleLoader`].
//!
//! A module that fails to load is logged and skipped; discovery carries on
//! with the rest. A missing plugin directory yields no modules.

use crate::plugin::builtin::api::get_all_builtin_plugins;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::types::{PluginDescriptor, PluginSource};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the plugin directory below the application base directory
pub const PLUGIN_DIR_NAME: &str = "plugins";

/// Turns a module file into the descriptors it provides
pub trait ModuleLoader: Send + Sync {
    fn load(&self, path: &Path) -> PluginResult<Vec<PluginDescriptor>>;
}

/// Loader for builds without in-process module loading; rejects every file
#[derive(Debug, Default)]
pub struct UnsupportedModuleLoader;

impl ModuleLoader for UnsupportedModuleLoader {
    fn load(&self, path: &Path) -> PluginResult<Vec<PluginDescriptor>> {
        Err(PluginError::LoadError {
            module: path.display().to_string(),
            cause: "loading compiled modules is not supported by this host".to_string(),
        })
    }
}

/// Configuration for plugin discovery
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Plugin directory to search; `None` disables module discovery
    pub search_path: Option<PathBuf>,
    /// Module file extension, without the dot
    pub extension: String,
    /// Whether to include builtin plugins
    pub include_builtins: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_path: Some(get_default_plugin_path()),
            extension: std::env::consts::DLL_EXTENSION.to_string(),
            include_builtins: true,
        }
    }
}

/// Everything discovery found, plus the modules that failed to load
#[derive(Debug, Default)]
pub struct DiscoveryOutcome {
    pub descriptors: Vec<PluginDescriptor>,
    pub failures: Vec<(PathBuf, PluginError)>,
}

pub struct PluginDiscovery {
    config: DiscoveryConfig,
    loader: Arc<dyn ModuleLoader>,
}

impl PluginDiscovery {
    pub fn new(config: DiscoveryConfig, loader: Arc<dyn ModuleLoader>) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Discover all available plugin descriptors
    pub fn discover_plugins(&self) -> PluginResult<DiscoveryOutcome> {
        let mut outcome = DiscoveryOutcome::default();

        if self.config.include_builtins {
            let builtins = get_all_builtin_plugins();
            log::debug!("Found {} builtin plugins", builtins.len());
            outcome.descriptors.extend(builtins);
        }

        if let Some(search_path) = &self.config.search_path {
            log::debug!("Discovering plugin modules from path: {:?}", search_path);
            for module in find_module_files(search_path, &self.config.extension)? {
                match self.loader.load(&module) {
                    Ok(descriptors) => {
                        log::debug!(
                            "Module {} provided {} plugin(s)",
                            module.display(),
                            descriptors.len()
                        );
                        outcome.descriptors.extend(descriptors.into_iter().map(|d| {
                            d.with_source(PluginSource::Module {
                                path: module.clone(),
                            })
                        }));
                    }
                    Err(e) => {
                        log::error!("Failed to load plugin module {}: {}", module.display(), e);
                        outcome.failures.push((module, e));
                    }
                }
            }
        }

        Ok(outcome)
    }
}

/// Find module files with `extension` under `dir`, recursively, sorted.
///
/// A directory that does not exist contains no modules.
pub fn find_module_files(dir: &Path, extension: &str) -> PluginResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        log::debug!("Plugin directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );
    let entries = glob::glob(&pattern).map_err(|e| PluginError::Discovery {
        message: format!("Invalid plugin search pattern '{}': {}", pattern, e),
    })?;

    let mut seen = HashSet::new();
    let mut modules = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => {
                let identity = path.canonicalize().unwrap_or_else(|_| path.clone());
                if seen.insert(identity) {
                    modules.push(path);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Cannot inspect {}: {}", e.path().display(), e.error()),
        }
    }

    modules.sort();
    Ok(modules)
}

/// `<executable directory>/plugins`, or `./plugins` when the executable path
/// is unavailable
pub fn get_default_plugin_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PLUGIN_DIR_NAME)
}
