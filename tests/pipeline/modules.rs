//! Plugin directory discovery through a module loader

use crate::common::{config_for, fixture, key, MapLoader, Alpha, Beta, Gamma};
use plughost::notifications::api::LifecycleEventBus;
use plughost::plugin::api::{PluginDescriptor, PluginManager, PluginSource};
use std::fs;
use std::sync::Arc;

fn alpha_module() -> Vec<PluginDescriptor> {
    vec![fixture::<Alpha>("A")]
}

fn beta_module() -> Vec<PluginDescriptor> {
    vec![
        fixture::<Beta>("B").requires_key(key::<Alpha>()),
        fixture::<Gamma>("C").soft_requires("Missing"),
    ]
}

fn loader() -> Arc<MapLoader> {
    Arc::new(
        MapLoader::default()
            .with("alpha", alpha_module)
            .with("beta", beta_module),
    )
}

#[tokio::test]
async fn test_broken_module_does_not_block_siblings() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp.path().join("vendor")).unwrap();
    fs::write(temp.path().join("beta.plug"), b"").unwrap();
    fs::write(temp.path().join("corrupt.plug"), b"").unwrap();
    fs::write(temp.path().join("vendor/alpha.plug"), b"").unwrap();
    fs::write(temp.path().join("notes.txt"), b"").unwrap();

    let mut manager = PluginManager::with_config(
        Arc::new(LifecycleEventBus::new()),
        config_for(Some(temp.path().to_path_buf()), false),
    )
    .with_loader(loader());

    assert_eq!(manager.load_plugins().await.unwrap(), 3);
    let report = manager.report().unwrap();
    assert_eq!(report.module_failures.len(), 1);
    assert!(report.module_failures[0].0.ends_with("corrupt.plug"));

    let a = manager.records().iter().find(|r| r.name == "A").unwrap();
    let b = manager.records().iter().find(|r| r.name == "B").unwrap();
    assert!(a.position < b.position);
}

#[tokio::test]
async fn test_missing_plugin_directory_is_not_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let mut manager = PluginManager::with_config(
        Arc::new(LifecycleEventBus::new()),
        config_for(Some(temp.path().join("plugins")), true),
    )
    .with_loader(loader());

    assert_eq!(manager.load_plugins().await.unwrap(), 2);
    assert!(manager.report().unwrap().module_failures.is_empty());
    assert!(manager.is_active("Core"));
    assert!(manager.is_active("ConsoleClient"));
}

#[tokio::test]
async fn test_module_and_builtin_descriptors_are_tagged() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join("alpha.plug"), b"").unwrap();

    let outcome = plughost::plugin::api::PluginDiscovery::new(
        config_for(Some(temp.path().to_path_buf()), true).discovery,
        loader(),
    )
    .discover_plugins()
    .unwrap();

    let alpha = outcome.descriptors.iter().find(|d| d.name == "A").unwrap();
    assert!(matches!(alpha.source, PluginSource::Module { .. }));
    let core = outcome.descriptors.iter().find(|d| d.name == "Core").unwrap();
    assert_eq!(core.source, PluginSource::Builtin);
}
