//! Work Wrappers
//!
//! A wrapper sits above a registry and tracks which entry the host is
//! currently working with. Wrappers are announced once the registries are
//! populated.

use crate::host::registry::{Client, NamedRegistry, Source};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub struct WorkWrapper<T> {
    registry: Arc<NamedRegistry<T>>,
    selected: RwLock<Option<String>>,
}

impl<T: Clone> WorkWrapper<T> {
    pub fn new(registry: Arc<NamedRegistry<T>>) -> Self {
        Self {
            registry,
            selected: RwLock::new(None),
        }
    }

    /// Select a registered entry; unknown names leave the selection unchanged
    pub fn select(&self, name: &str) -> bool {
        if !self.registry.contains(name) {
            log::warn!("Cannot select '{}': not registered", name);
            return false;
        }
        *self.selected.write().unwrap_or_else(PoisonError::into_inner) = Some(name.to_string());
        true
    }

    /// Select the first registered entry when nothing is selected yet
    pub fn select_default(&self) -> Option<String> {
        if let Some(name) = self.selected_name() {
            return Some(name);
        }
        let first = self.registry.names().into_iter().next()?;
        self.select(&first);
        Some(first)
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn selected(&self) -> Option<T> {
        self.selected_name().and_then(|name| self.registry.get(&name))
    }

    pub fn registry(&self) -> &Arc<NamedRegistry<T>> {
        &self.registry
    }
}

impl<T: Clone> fmt::Debug for WorkWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkWrapper")
            .field("selected", &self.selected_name())
            .finish()
    }
}

pub type SourceWorkWrapper = WorkWrapper<Arc<dyn Source>>;
pub type ClientWorkWrapper = WorkWrapper<Arc<dyn Client>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_only_registered_entries() {
        let registry = Arc::new(NamedRegistry::new());
        registry.register("alpha", 1u8);
        registry.register("beta", 2u8);
        let wrapper = WorkWrapper::new(registry);

        assert_eq!(wrapper.selected(), None);
        assert!(wrapper.select("beta"));
        assert!(!wrapper.select("gamma"));
        assert_eq!(wrapper.selected(), Some(2));
        assert_eq!(wrapper.selected_name().as_deref(), Some("beta"));
    }

    #[test]
    fn test_select_default_picks_first() {
        let registry = Arc::new(NamedRegistry::new());
        let wrapper = WorkWrapper::new(registry.clone());
        assert_eq!(wrapper.select_default(), None);

        registry.register("alpha", 1u8);
        registry.register("beta", 2u8);
        assert_eq!(wrapper.select_default().as_deref(), Some("alpha"));
        wrapper.select("beta");
        assert_eq!(wrapper.select_default().as_deref(), Some("beta"));
    }
}
