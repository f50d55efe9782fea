//! Type definitions for the plugin system
//!
//! A [`PluginDescriptor`] is everything the resolver needs to know about a
//! candidate before it exists: its concrete type, the name soft dependencies
//! refer to, its declared dependencies and a way to construct it.

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::Plugin;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;

/// Plugin metadata information
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

impl PluginInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "0.0.0".to_string(),
            description: String::new(),
            author: String::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

/// Identity of a concrete plugin type.
///
/// Equality and hashing use the `TypeId` only; the type name is kept for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct PluginKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without module path or generic arguments
    pub fn short_name(&self) -> &'static str {
        let without_generics = self
            .type_name
            .split_once('<')
            .map_or(self.type_name, |(head, _)| head);
        without_generics
            .rsplit("::")
            .next()
            .unwrap_or(without_generics)
    }
}

impl PartialEq for PluginKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for PluginKey {}

impl Hash for PluginKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginKey({})", self.type_name)
    }
}

impl fmt::Display for PluginKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Where a descriptor came from
#[derive(Debug, Clone, PartialEq)]
pub enum PluginSource {
    /// Compiled into the host and registered with `builtin_plugin!`
    Builtin,
    /// Registered by the host application at startup
    Registered,
    /// Produced by a module file in the plugin directory
    Module { path: PathBuf },
}

/// Constructor for a plugin instance
pub type PluginFactory = Arc<dyn Fn() -> PluginResult<Arc<dyn Plugin>> + Send + Sync>;

/// Static description of a plugin candidate
#[derive(Clone)]
pub struct PluginDescriptor {
    pub key: PluginKey,
    /// Name soft dependencies refer to; defaults to the short type name
    pub name: String,
    pub hard_dependencies: Vec<PluginKey>,
    pub soft_dependencies: Vec<String>,
    pub api_version: u32,
    pub source: PluginSource,
    factory: PluginFactory,
}

impl PluginDescriptor {
    /// Describe plugin type `T`, constructed by `factory`
    pub fn of<T, F>(factory: F) -> Self
    where
        T: Plugin + 'static,
        F: Fn() -> PluginResult<T> + Send + Sync + 'static,
    {
        let key = PluginKey::of::<T>();
        Self {
            key,
            name: key.short_name().to_string(),
            hard_dependencies: Vec::new(),
            soft_dependencies: Vec::new(),
            api_version: crate::core::version::get_api_version(),
            source: PluginSource::Registered,
            factory: Arc::new(move || factory().map(|plugin| Arc::new(plugin) as Arc<dyn Plugin>)),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare a hard dependency on plugin type `D`
    pub fn requires<D: Plugin + 'static>(self) -> Self {
        self.requires_key(PluginKey::of::<D>())
    }

    pub fn requires_key(mut self, key: PluginKey) -> Self {
        if !self.hard_dependencies.contains(&key) {
            self.hard_dependencies.push(key);
        }
        self
    }

    /// Declare a soft dependency on the candidate called `name`
    pub fn soft_requires(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.soft_dependencies.contains(&name) {
            self.soft_dependencies.push(name);
        }
        self
    }

    pub fn with_api_version(mut self, api_version: u32) -> Self {
        self.api_version = api_version;
        self
    }

    pub fn with_source(mut self, source: PluginSource) -> Self {
        self.source = source;
        self
    }

    /// Construct a new instance
    pub fn instantiate(&self) -> PluginResult<Arc<dyn Plugin>> {
        (self.factory)().map_err(|e| match e {
            PluginError::InstantiationFailed { .. } => e,
            other => PluginError::InstantiationFailed {
                plugin_name: self.name.clone(),
                cause: other.to_string(),
            },
        })
    }

    /// One-hop reference check: does this descriptor name `other` as a hard
    /// dependency (by type) or a soft dependency (by name)?
    pub fn references(&self, other: &PluginDescriptor) -> bool {
        self.hard_dependencies.contains(&other.key) || self.soft_dependencies.contains(&other.name)
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("hard_dependencies", &self.hard_dependencies)
            .field("soft_dependencies", &self.soft_dependencies)
            .field("api_version", &self.api_version)
            .field("source", &self.source)
            .finish()
    }
}
