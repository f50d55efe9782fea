//! Host startup driver
//!
//! `Host::start` walks the fixed startup sequence; `Host::ready` raises
//! `ProgramReady` whenever the application decides it is ready. Each stage
//! can run once and only after the one before it.

use crate::host::context::HostContext;
use crate::notifications::api::LifecycleEventBus;
use crate::plugin::api::{
    ActivationRecord, Plugin, PluginError, PluginManager, PluginManagerConfig, PluginResult,
};
use std::sync::Arc;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumIter)]
pub enum StartupStage {
    Created,
    PluginsLoaded,
    CommandsLoaded,
    SourcesLoaded,
    FiltersLoaded,
    ClientsLoaded,
    WrappersAnnounced,
    LoadComplete,
    ProgramReady,
}

impl StartupStage {
    pub fn next(self) -> Option<StartupStage> {
        use StartupStage::*;
        match self {
            Created => Some(PluginsLoaded),
            PluginsLoaded => Some(CommandsLoaded),
            CommandsLoaded => Some(SourcesLoaded),
            SourcesLoaded => Some(FiltersLoaded),
            FiltersLoaded => Some(ClientsLoaded),
            ClientsLoaded => Some(WrappersAnnounced),
            WrappersAnnounced => Some(LoadComplete),
            LoadComplete => Some(ProgramReady),
            ProgramReady => None,
        }
    }
}

/// Counts reported by each stage of `Host::start`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartupSummary {
    pub plugins: usize,
    pub commands: usize,
    pub sources: usize,
    pub filters: usize,
    pub clients: usize,
}

pub struct Host {
    context: HostContext,
    plugins: PluginManager,
    stage: StartupStage,
}

impl Host {
    pub fn new(bus: Arc<LifecycleEventBus>, config: PluginManagerConfig) -> Self {
        let plugins = PluginManager::with_config(bus.clone(), config);
        Self::with_manager(HostContext::new(bus), plugins)
    }

    /// Drive an existing manager; it must share the context's bus
    pub fn with_manager(context: HostContext, plugins: PluginManager) -> Self {
        Self {
            context,
            plugins,
            stage: StartupStage::Created,
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }

    pub fn plugin_manager(&self) -> &PluginManager {
        &self.plugins
    }

    pub fn plugin_manager_mut(&mut self) -> &mut PluginManager {
        &mut self.plugins
    }

    pub fn stage(&self) -> StartupStage {
        self.stage
    }

    pub fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.plugins()
    }

    pub fn activations(&self) -> &[ActivationRecord] {
        self.plugins.records()
    }

    fn check_next(&self, attempted: StartupStage) -> PluginResult<()> {
        if self.stage.next() != Some(attempted) {
            return Err(PluginError::StageOrder {
                current: self.stage.to_string(),
                attempted: attempted.to_string(),
            });
        }
        Ok(())
    }

    /// Record a stage whose work has completed
    fn complete(&mut self, stage: StartupStage) {
        log::debug!("Startup stage {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    /// Load plugins and run every subsystem stage up to `LoadComplete`.
    ///
    /// A stage is only recorded once its work succeeded, so a failed start
    /// leaves the host at the last completed stage.
    pub async fn start(&mut self) -> PluginResult<StartupSummary> {
        self.check_next(StartupStage::PluginsLoaded)?;
        let plugins = self.plugins.load_plugins().await?;
        self.complete(StartupStage::PluginsLoaded);

        let commands = self.plugins.load_commands(&self.context.commands).await?;
        log::info!("Loaded {} commands", commands);
        self.complete(StartupStage::CommandsLoaded);

        let sources = self.plugins.load_sources(&self.context.sources).await?;
        log::info!("Loaded {} sources", sources);
        self.complete(StartupStage::SourcesLoaded);

        let filters = self.plugins.load_filters(&self.context.filters).await?;
        log::info!("Loaded {} filters", filters);
        self.complete(StartupStage::FiltersLoaded);

        let clients = self.plugins.load_clients(&self.context.clients).await?;
        log::info!("Loaded {} clients", clients);
        self.complete(StartupStage::ClientsLoaded);

        self.plugins
            .announce_wrappers(&self.context.source_wrapper, &self.context.client_wrapper)
            .await?;
        self.complete(StartupStage::WrappersAnnounced);

        self.plugins
            .raise_load_complete(self.context.clone())
            .await?;
        self.complete(StartupStage::LoadComplete);

        Ok(StartupSummary {
            plugins,
            commands,
            sources,
            filters,
            clients,
        })
    }

    /// Signal that normal operation may begin
    pub async fn ready(&mut self) -> PluginResult<()> {
        self.check_next(StartupStage::ProgramReady)?;
        self.plugins.raise_program_ready().await?;
        self.complete(StartupStage::ProgramReady);
        Ok(())
    }
}
