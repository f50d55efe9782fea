//! Console client builtin plugin
//!
//! Registers a `console` client that writes lines to standard output and a
//! `trim` filter. Soft-depends on Core so it activates after it when both
//! are present.

use crate::host::api::Client;
use crate::notifications::api::{LifecycleEvent, LifecycleEventBus, LifecycleEventKind};
use crate::plugin::builtin::commands::CORE_PLUGIN_NAME;
use crate::plugin::error::PluginResult;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{PluginDescriptor, PluginInfo};
use std::sync::Arc;

pub const CONSOLE_CLIENT_NAME: &str = "console";

#[derive(Debug, Default)]
pub struct ConsoleClient;

impl Client for ConsoleClient {
    fn description(&self) -> String {
        "Writes lines to standard output".to_string()
    }

    fn deliver(&self, line: &str) {
        println!("{}", line);
    }
}

#[derive(Debug, Default)]
pub struct ConsoleClientPlugin;

impl ConsoleClientPlugin {
    pub fn descriptor() -> PluginDescriptor {
        PluginDescriptor::of(|| Ok(ConsoleClientPlugin))
            .named("ConsoleClient")
            .soft_requires(CORE_PLUGIN_NAME)
    }
}

crate::builtin_plugin!(ConsoleClientPlugin::descriptor);

#[async_trait::async_trait]
impl Plugin for ConsoleClientPlugin {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new("ConsoleClient")
            .with_version(env!("CARGO_PKG_VERSION"))
            .with_description("Console client and line filters")
            .with_author("Plughost Contributors")
    }

    async fn on_enable(&self, bus: &LifecycleEventBus) -> PluginResult<()> {
        bus.subscribe_fn(LifecycleEventKind::FiltersReady, "console.filters", |event| {
            if let LifecycleEvent::FiltersReady(filters) = event {
                filters.register("trim", |line| line.trim().to_string());
            }
            Ok(())
        });

        bus.subscribe_fn(LifecycleEventKind::ClientsReady, "console.clients", |event| {
            if let LifecycleEvent::ClientsReady(clients) = event {
                clients.register(CONSOLE_CLIENT_NAME, Arc::new(ConsoleClient) as Arc<dyn Client>);
            }
            Ok(())
        });

        bus.subscribe_fn(LifecycleEventKind::ClientWrapperReady, "console.wrapper", |event| {
            if let LifecycleEvent::ClientWrapperReady(wrapper) = event {
                if wrapper.selected_name().is_none() {
                    wrapper.select(CONSOLE_CLIENT_NAME);
                }
            }
            Ok(())
        });
        Ok(())
    }
}
