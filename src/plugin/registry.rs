//! Activation Registry
//!
//! Ordered record of every plugin instance activated during this run. This
//! is the single authority for "is X already active".

use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::Plugin;
use crate::plugin::types::PluginKey;
use std::collections::HashSet;
use std::sync::Arc;

/// An activated plugin and its place in the activation order
#[derive(Clone)]
pub struct ActivationRecord {
    pub plugin: Arc<dyn Plugin>,
    /// Display name reported by the plugin itself
    pub display_name: String,
    /// Candidate name used for dependency matching
    pub name: String,
    pub key: PluginKey,
    /// Zero-based position in the activation order
    pub position: usize,
}

impl std::fmt::Debug for ActivationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationRecord")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("position", &self.position)
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ActivationRegistry {
    records: Vec<ActivationRecord>,
    active: HashSet<PluginKey>,
}

impl ActivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an activated plugin; a type can only be recorded once
    pub fn record(
        &mut self,
        key: PluginKey,
        name: impl Into<String>,
        plugin: Arc<dyn Plugin>,
    ) -> PluginResult<&ActivationRecord> {
        let name = name.into();
        if !self.active.insert(key) {
            return Err(PluginError::AlreadyActive { plugin_name: name });
        }

        let position = self.records.len();
        self.records.push(ActivationRecord {
            display_name: plugin.plugin_info().name,
            plugin,
            name,
            key,
            position,
        });
        Ok(&self.records[position])
    }

    pub fn is_active(&self, key: &PluginKey) -> bool {
        self.active.contains(key)
    }

    pub fn is_name_active(&self, name: &str) -> bool {
        self.records.iter().any(|r| r.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ActivationRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Records in activation order
    pub fn records(&self) -> &[ActivationRecord] {
        &self.records
    }

    /// Plugin instances in activation order
    pub fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.records.iter().map(|r| r.plugin.clone()).collect()
    }

    /// Candidate names in activation order
    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
