//! Lifecycle event catalogue
//!
//! Events are raised in a fixed order during startup. Every variant carries
//! exactly the payload its listeners need; subsystem payloads are shared
//! handles that plugins mutate through the subsystem's own API.

use std::fmt;
use std::sync::Arc;

use strum_macros::{Display, EnumIter};

use crate::host::api::{
    ClientRegistry, ClientWorkWrapper, CommandRegistry, FilterRegistry, HostContext,
    SourceRegistry, SourceWorkWrapper,
};
use crate::plugin::traits::Plugin;

/// Event kinds, declared in the order the host raises them
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum LifecycleEventKind {
    PluginInitialized,
    CommandsReady,
    SourcesReady,
    FiltersReady,
    ClientsReady,
    SourceWrapperReady,
    ClientWrapperReady,
    LoadComplete,
    ProgramReady,
}

impl LifecycleEventKind {
    /// Only the per-plugin event may be raised more than once per run
    pub fn is_repeatable(self) -> bool {
        matches!(self, LifecycleEventKind::PluginInitialized)
    }
}

/// A lifecycle event and its payload
#[derive(Clone)]
pub enum LifecycleEvent {
    /// A plugin was activated; raised once per activation
    PluginInitialized {
        name: String,
        plugin: Arc<dyn Plugin>,
    },
    CommandsReady(Arc<CommandRegistry>),
    SourcesReady(Arc<SourceRegistry>),
    FiltersReady(Arc<FilterRegistry>),
    ClientsReady(Arc<ClientRegistry>),
    SourceWrapperReady(Arc<SourceWorkWrapper>),
    ClientWrapperReady(Arc<ClientWorkWrapper>),
    /// Activation and subsystem initialisation are finished
    LoadComplete {
        host: HostContext,
        plugins: Vec<Arc<dyn Plugin>>,
    },
    ProgramReady,
}

impl LifecycleEvent {
    pub fn kind(&self) -> LifecycleEventKind {
        match self {
            LifecycleEvent::PluginInitialized { .. } => LifecycleEventKind::PluginInitialized,
            LifecycleEvent::CommandsReady(_) => LifecycleEventKind::CommandsReady,
            LifecycleEvent::SourcesReady(_) => LifecycleEventKind::SourcesReady,
            LifecycleEvent::FiltersReady(_) => LifecycleEventKind::FiltersReady,
            LifecycleEvent::ClientsReady(_) => LifecycleEventKind::ClientsReady,
            LifecycleEvent::SourceWrapperReady(_) => LifecycleEventKind::SourceWrapperReady,
            LifecycleEvent::ClientWrapperReady(_) => LifecycleEventKind::ClientWrapperReady,
            LifecycleEvent::LoadComplete { .. } => LifecycleEventKind::LoadComplete,
            LifecycleEvent::ProgramReady => LifecycleEventKind::ProgramReady,
        }
    }
}

impl fmt::Debug for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::PluginInitialized { name, .. } => f
                .debug_struct("PluginInitialized")
                .field("name", name)
                .finish(),
            LifecycleEvent::LoadComplete { plugins, .. } => f
                .debug_struct("LoadComplete")
                .field("plugins", &plugins.len())
                .finish(),
            other => write!(f, "{}", other.kind()),
        }
    }
}
