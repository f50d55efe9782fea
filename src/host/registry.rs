//! Subsystem Registries
//!
//! Name-keyed registries for sources, filters and clients. Plugins register
//! entries while handling the matching `*Ready` event; the host only needs
//! the count afterwards. Entries keep registration order.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

/// A data source a plugin makes available to the host
pub trait Source: Send + Sync {
    fn description(&self) -> String;

    /// Produce the next batch of lines, if any
    fn poll(&self) -> Vec<String> {
        Vec::new()
    }
}

/// A client or transport the host can deliver output to
pub trait Client: Send + Sync {
    fn description(&self) -> String;

    fn deliver(&self, line: &str);
}

/// Thread-safe, insertion-ordered registry keyed by name
pub struct NamedRegistry<T> {
    entries: RwLock<Vec<(String, T)>>,
}

impl<T> Default for NamedRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl<T> fmt::Debug for NamedRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_list()
            .entries(entries.iter().map(|(name, _)| name))
            .finish()
    }
}

impl<T: Clone> NamedRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` under `name`; returns false if the name is taken
    pub fn register(&self, name: impl Into<String>, item: T) -> bool {
        let name = name.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.iter().any(|(existing, _)| *existing == name) {
            log::warn!("'{}' is already registered", name);
            return false;
        }
        log::debug!("Registered '{}'", name);
        entries.push((name, item));
        true
    }

    pub fn get(&self, name: &str) -> Option<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, item)| item.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Items in registration order
    pub fn items(&self) -> Vec<T> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub type SourceRegistry = NamedRegistry<Arc<dyn Source>>;
pub type ClientRegistry = NamedRegistry<Arc<dyn Client>>;

/// Line transformation registered by a plugin
pub type FilterFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Filters, applied in registration order
#[derive(Debug, Default)]
pub struct FilterRegistry {
    filters: NamedRegistry<FilterFn>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, name: impl Into<String>, filter: F) -> bool
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.register(name, Arc::new(filter))
    }

    /// Run `input` through every filter
    pub fn apply(&self, input: &str) -> String {
        self.filters
            .items()
            .iter()
            .fold(input.to_string(), |line, filter| filter(&line))
    }

    pub fn names(&self) -> Vec<String> {
        self.filters.names()
    }

    pub fn count(&self) -> usize {
        self.filters.count()
    }
}
