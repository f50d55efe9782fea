//! Common test utilities and helpers
//!
//! Fixture plugins with distinct concrete types, and a module loader that
//! maps file stems to descriptors.

use plughost::notifications::api::{LifecycleEvent, LifecycleEventBus, LifecycleEventKind};
use plughost::plugin::api::{
    DiscoveryConfig, ModuleLoader, Plugin, PluginDescriptor, PluginError, PluginInfo,
    PluginKey, PluginManagerConfig, PluginResult,
};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub struct Fixture<M> {
    name: String,
    _marker: PhantomData<fn() -> M>,
}

#[async_trait::async_trait]
impl<M: 'static> Plugin for Fixture<M> {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new(self.name.clone()).with_version("0.1.0")
    }
}

pub struct Alpha;
pub struct Beta;
pub struct Gamma;
pub struct Delta;

pub fn key<M: 'static>() -> PluginKey {
    PluginKey::of::<Fixture<M>>()
}

pub fn fixture<M: 'static>(name: &str) -> PluginDescriptor {
    let name = name.to_string();
    let label = name.clone();
    PluginDescriptor::of(move || {
        Ok(Fixture::<M> {
            name: label.clone(),
            _marker: PhantomData,
        })
    })
    .named(name)
}

/// Records the name of every plugin that subscribes to stage events
pub struct StageProbe {
    pub trace: Arc<Mutex<Vec<String>>>,
}

#[async_trait::async_trait]
impl Plugin for StageProbe {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new("StageProbe")
    }

    async fn on_enable(&self, bus: &LifecycleEventBus) -> PluginResult<()> {
        use LifecycleEventKind::*;
        for kind in [
            CommandsReady,
            SourcesReady,
            FiltersReady,
            ClientsReady,
            SourceWrapperReady,
            ClientWrapperReady,
            LoadComplete,
            ProgramReady,
        ] {
            let trace = self.trace.clone();
            bus.subscribe_fn(kind, format!("probe.{}", kind), move |event: &LifecycleEvent| {
                let entry = match event {
                    LifecycleEvent::CommandsReady(commands) => {
                        format!("{} {}", event.kind(), commands.count())
                    }
                    LifecycleEvent::FiltersReady(filters) => {
                        format!("{} {}", event.kind(), filters.count())
                    }
                    LifecycleEvent::ClientsReady(clients) => {
                        format!("{} {}", event.kind(), clients.count())
                    }
                    other => other.kind().to_string(),
                };
                trace.lock().unwrap().push(entry);
                Ok(())
            });
        }
        Ok(())
    }
}

/// Loader that serves descriptors by file stem; unknown stems fail to load
#[derive(Default)]
pub struct MapLoader {
    modules: HashMap<String, fn() -> Vec<PluginDescriptor>>,
}

impl MapLoader {
    pub fn with(mut self, stem: &str, descriptors: fn() -> Vec<PluginDescriptor>) -> Self {
        self.modules.insert(stem.to_string(), descriptors);
        self
    }
}

impl ModuleLoader for MapLoader {
    fn load(&self, path: &Path) -> PluginResult<Vec<PluginDescriptor>> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        match self.modules.get(stem) {
            Some(descriptors) => Ok(descriptors()),
            None => Err(PluginError::LoadError {
                module: path.display().to_string(),
                cause: "bad image format".to_string(),
            }),
        }
    }
}

pub fn config_for(dir: Option<PathBuf>, include_builtins: bool) -> PluginManagerConfig {
    PluginManagerConfig {
        discovery: DiscoveryConfig {
            search_path: dir,
            extension: "plug".to_string(),
            include_builtins,
        },
        ..PluginManagerConfig::default()
    }
}
