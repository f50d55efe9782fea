//! Host stage order and counts

use crate::common::{config_for, StageProbe};
use plughost::host::api::{Host, HostContext, StartupStage};
use plughost::notifications::api::{DispatchMode, LifecycleEventBus};
use plughost::plugin::api::{PluginDescriptor, PluginError, PluginManager};
use std::sync::{Arc, Mutex};

fn probed_host(trace: Arc<Mutex<Vec<String>>>) -> Host {
    let bus = Arc::new(LifecycleEventBus::new());
    let mut manager = PluginManager::with_config(bus.clone(), config_for(None, true));
    manager.register_descriptor(
        PluginDescriptor::of(move || Ok(StageProbe { trace: trace.clone() }))
            .soft_requires("ConsoleClient"),
    );
    Host::with_manager(HostContext::new(bus), manager)
}

#[tokio::test]
async fn test_stages_fire_in_fixed_order_with_counts() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut host = probed_host(trace.clone());

    let summary = host.start().await.unwrap();
    assert_eq!(summary.plugins, 3);
    assert_eq!(summary.commands, 2);
    assert_eq!(summary.sources, 0);
    assert_eq!(summary.filters, 1);
    assert_eq!(summary.clients, 1);

    host.ready().await.unwrap();
    assert_eq!(host.stage(), StartupStage::ProgramReady);

    // the probe activates after the builtins, so it sees their registrations
    assert_eq!(
        *trace.lock().unwrap(),
        vec![
            "CommandsReady 2",
            "SourcesReady",
            "FiltersReady 1",
            "ClientsReady 1",
            "SourceWrapperReady",
            "ClientWrapperReady",
            "LoadComplete",
            "ProgramReady",
        ]
    );
}

#[tokio::test]
async fn test_ready_is_decoupled_from_start() {
    let trace = Arc::new(Mutex::new(Vec::new()));
    let mut host = probed_host(trace.clone());
    host.start().await.unwrap();
    assert!(!trace.lock().unwrap().iter().any(|e| e == "ProgramReady"));

    host.ready().await.unwrap();
    assert!(matches!(
        host.ready().await,
        Err(PluginError::StageOrder { .. })
    ));
}

#[tokio::test]
async fn test_synchronous_events_and_commands() {
    let bus = Arc::new(LifecycleEventBus::with_mode(DispatchMode::Synchronous));
    let mut host = Host::new(bus, config_for(None, true));
    host.start().await.unwrap();

    let commands = &host.context().commands;
    let listing = commands.dispatch("plugins", &[]).unwrap();
    assert!(listing.lines().next().unwrap().starts_with("Core"));
    assert!(listing.contains("ConsoleClient"));
    assert_eq!(host.context().filters.apply("  spaced  "), "spaced");
}
