//! Host Context
//!
//! The assembled host as plugins see it: every subsystem plus the event bus.
//! Cloning is cheap; all members are shared.

use crate::host::commands::CommandRegistry;
use crate::host::registry::{ClientRegistry, FilterRegistry, SourceRegistry};
use crate::host::wrappers::{ClientWorkWrapper, SourceWorkWrapper};
use crate::notifications::api::LifecycleEventBus;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HostContext {
    pub bus: Arc<LifecycleEventBus>,
    pub commands: Arc<CommandRegistry>,
    pub sources: Arc<SourceRegistry>,
    pub filters: Arc<FilterRegistry>,
    pub clients: Arc<ClientRegistry>,
    pub source_wrapper: Arc<SourceWorkWrapper>,
    pub client_wrapper: Arc<ClientWorkWrapper>,
}

impl HostContext {
    /// Fresh, empty subsystems sharing `bus`
    pub fn new(bus: Arc<LifecycleEventBus>) -> Self {
        let sources = Arc::new(SourceRegistry::new());
        let clients = Arc::new(ClientRegistry::new());
        Self {
            bus,
            commands: Arc::new(CommandRegistry::new()),
            source_wrapper: Arc::new(SourceWorkWrapper::new(sources.clone())),
            client_wrapper: Arc::new(ClientWorkWrapper::new(clients.clone())),
            sources,
            filters: Arc::new(FilterRegistry::new()),
            clients,
        }
    }

    /// Registry sizes in stage order: commands, sources, filters, clients
    pub fn counts(&self) -> [usize; 4] {
        [
            self.commands.count(),
            self.sources.count(),
            self.filters.count(),
            self.clients.count(),
        ]
    }
}
