//! Core builtin plugin
//!
//! Contributes the host's own commands: `plugins` lists the active plugins
//! once loading completes, `help` lists every registered command.

use crate::host::api::CommandRegistry;
use crate::notifications::api::{LifecycleEvent, LifecycleEventBus, LifecycleEventKind};
use crate::plugin::error::PluginResult;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{PluginDescriptor, PluginInfo};
use std::sync::{Arc, PoisonError, RwLock};

pub const CORE_PLUGIN_NAME: &str = "Core";

#[derive(Debug, Default)]
pub struct CorePlugin {
    loaded: Arc<RwLock<Vec<String>>>,
}

impl CorePlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::of(|| Ok(CorePlugin::new())).named(CORE_PLUGIN_NAME)
    }
}

crate::builtin_plugin!(CorePlugin::descriptor);

fn register_commands(commands: &Arc<CommandRegistry>, loaded: Arc<RwLock<Vec<String>>>) {
    commands.register("plugins", "List active plugins", move |_| {
        loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .join("\n")
    });

    let registry = Arc::downgrade(commands);
    commands.register("help", "List available commands", move |_| {
        let Some(registry) = registry.upgrade() else {
            return String::new();
        };
        registry
            .entries()
            .iter()
            .map(|c| format!("{:<12} {}", c.name, c.description))
            .collect::<Vec<_>>()
            .join("\n")
    });
}

#[async_trait::async_trait]
impl Plugin for CorePlugin {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new(CORE_PLUGIN_NAME)
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_description("Host commands")
            .with_author("Plughost Contributors")
    }

    async fn on_enable(&self, bus: &LifecycleEventBus) -> PluginResult<()> {
        let loaded = self.loaded.clone();
        bus.subscribe_fn(LifecycleEventKind::CommandsReady, "core.commands", move |event| {
            if let LifecycleEvent::CommandsReady(commands) = event {
                register_commands(commands, loaded.clone());
            }
            Ok(())
        });

        let loaded = self.loaded.clone();
        bus.subscribe_fn(LifecycleEventKind::LoadComplete, "core.load-complete", move |event| {
            if let LifecycleEvent::LoadComplete { plugins, .. } = event {
                *loaded.write().unwrap_or_else(PoisonError::into_inner) = plugins
                    .iter()
                    .map(|plugin| {
                        let info = plugin.plugin_info();
                        format!("{} {}", info.name, info.version)
                    })
                    .collect();
            }
            Ok(())
        });
        Ok(())
    }
}
