//! Plugin Manager
//!
//! Runs discovery, candidate scanning and dependency resolution, then gives
//! the host its query surface and the count-returning subsystem triggers.

use crate::core::version;
use crate::host::api::{
    ClientRegistry, ClientWorkWrapper, CommandRegistry, FilterRegistry, HostContext,
    SourceRegistry, SourceWorkWrapper,
};
use crate::notifications::api::{LifecycleEvent, LifecycleEventBus, NotificationError};
use crate::plugin::discovery::{DiscoveryConfig, ModuleLoader, PluginDiscovery, UnsupportedModuleLoader};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::registry::{ActivationRecord, ActivationRegistry};
use crate::plugin::resolver::{CycleDetection, DependencyResolver, ResolutionReport};
use crate::plugin::scanner::CandidateScanner;
use crate::plugin::traits::Plugin;
use crate::plugin::types::PluginDescriptor;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct PluginManagerConfig {
    pub discovery: DiscoveryConfig,
    /// Candidate names never activated
    pub excluded_plugins: Vec<String>,
    pub cycle_detection: CycleDetection,
}

/// Everything that happened while loading plugins
#[derive(Debug, Default)]
pub struct LoadReport {
    pub module_failures: Vec<(PathBuf, PluginError)>,
    pub rejected: Vec<(String, PluginError)>,
    pub excluded: Vec<String>,
    pub resolution: ResolutionReport,
}

pub struct PluginManager {
    api_version: u32,
    config: PluginManagerConfig,
    bus: Arc<LifecycleEventBus>,
    loader: Arc<dyn ModuleLoader>,
    registered: Vec<PluginDescriptor>,
    registry: ActivationRegistry,
    report: Option<LoadReport>,
}

impl PluginManager {
    pub fn new(bus: Arc<LifecycleEventBus>) -> Self {
        Self::with_config(bus, PluginManagerConfig::default())
    }

    pub fn with_config(bus: Arc<LifecycleEventBus>, config: PluginManagerConfig) -> Self {
        Self {
            api_version: version::get_api_version(),
            config,
            bus,
            loader: Arc::new(UnsupportedModuleLoader),
            registered: Vec::new(),
            registry: ActivationRegistry::new(),
            report: None,
        }
    }

    /// Use `loader` for module files found in the plugin directory
    pub fn with_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Add a plugin the host application provides directly
    pub fn register_descriptor(&mut self, descriptor: PluginDescriptor) {
        log::debug!("Registered plugin descriptor '{}'", descriptor.name);
        self.registered.push(descriptor);
    }

    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    pub fn config(&self) -> &PluginManagerConfig {
        &self.config
    }

    pub fn bus(&self) -> &Arc<LifecycleEventBus> {
        &self.bus
    }

    /// Discover, scan and activate plugins. Returns the number activated.
    ///
    /// Only the first call does any work.
    pub async fn load_plugins(&mut self) -> PluginResult<usize> {
        if self.report.is_some() {
            log::debug!("Plugins already loaded");
            return Ok(self.registry.len());
        }

        let discovery = PluginDiscovery::new(self.config.discovery.clone(), self.loader.clone());
        let mut discovered = discovery.discover_plugins()?;
        discovered.descriptors.extend(self.registered.drain(..));

        let scan = CandidateScanner::new(self.api_version)
            .with_exclusions(self.config.excluded_plugins.clone())
            .scan(discovered.descriptors);

        let resolution = DependencyResolver::new(self.config.cycle_detection)
            .resolve(&scan.candidates, &mut self.registry, &self.bus)
            .await;

        let delivered = self.bus.wait_detached().await;
        log::debug!("{} plugin initialized deliveries completed", delivered);

        let activated = resolution.activated.len();
        log::info!(
            "Activated {} of {} plugin candidates",
            activated,
            scan.candidates.len()
        );

        self.report = Some(LoadReport {
            module_failures: discovered.failures,
            rejected: scan.rejected,
            excluded: scan.excluded,
            resolution,
        });
        Ok(activated)
    }

    /// Active plugin instances in activation order
    pub fn plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.registry.plugins()
    }

    pub fn records(&self) -> &[ActivationRecord] {
        self.registry.records()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.registry.is_name_active(name)
    }

    /// `None` until `load_plugins` has run
    pub fn report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub async fn load_commands(&self, commands: &Arc<CommandRegistry>) -> PluginResult<usize> {
        self.raise(LifecycleEvent::CommandsReady(commands.clone()))
            .await?;
        Ok(commands.count())
    }

    pub async fn load_sources(&self, sources: &Arc<SourceRegistry>) -> PluginResult<usize> {
        self.raise(LifecycleEvent::SourcesReady(sources.clone()))
            .await?;
        Ok(sources.count())
    }

    pub async fn load_filters(&self, filters: &Arc<FilterRegistry>) -> PluginResult<usize> {
        self.raise(LifecycleEvent::FiltersReady(filters.clone()))
            .await?;
        Ok(filters.count())
    }

    pub async fn load_clients(&self, clients: &Arc<ClientRegistry>) -> PluginResult<usize> {
        self.raise(LifecycleEvent::ClientsReady(clients.clone()))
            .await?;
        Ok(clients.count())
    }

    pub async fn announce_wrappers(
        &self,
        source_wrapper: &Arc<SourceWorkWrapper>,
        client_wrapper: &Arc<ClientWorkWrapper>,
    ) -> PluginResult<()> {
        self.raise(LifecycleEvent::SourceWrapperReady(source_wrapper.clone()))
            .await?;
        self.raise(LifecycleEvent::ClientWrapperReady(client_wrapper.clone()))
            .await
    }

    pub async fn raise_load_complete(&self, host: HostContext) -> PluginResult<()> {
        self.raise(LifecycleEvent::LoadComplete {
            host,
            plugins: self.plugins(),
        })
        .await
    }

    pub async fn raise_program_ready(&self) -> PluginResult<()> {
        self.raise(LifecycleEvent::ProgramReady).await
    }

    /// Synchronous raise; listener failures are reported but not fatal
    async fn raise(&self, event: LifecycleEvent) -> PluginResult<()> {
        let kind = event.kind();
        match self.bus.publish(event).await {
            Ok(delivered) => {
                log::debug!("{} delivered to {} listener(s)", kind, delivered);
                Ok(())
            }
            Err(NotificationError::ListenerFailed {
                failed_listeners, ..
            }) => {
                log::warn!(
                    "{} listener(s) failed during {}: {}",
                    failed_listeners.len(),
                    kind,
                    failed_listeners.join(", ")
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("api_version", &self.api_version)
            .field("config", &self.config)
            .field("active", &self.registry.names())
            .finish()
    }
}
