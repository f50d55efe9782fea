//! Activation order through the public plugin manager

use crate::common::{config_for, fixture, key, Alpha, Beta, Delta, Gamma};
use plughost::notifications::api::LifecycleEventBus;
use plughost::plugin::api::{CycleDetection, PluginDescriptor, PluginManager};
use std::sync::Arc;

async fn activation_order(descriptors: Vec<PluginDescriptor>) -> (Vec<String>, usize) {
    let mut manager =
        PluginManager::with_config(Arc::new(LifecycleEventBus::new()), config_for(None, false));
    for descriptor in descriptors {
        manager.register_descriptor(descriptor);
    }
    manager.load_plugins().await.unwrap();
    let names = manager.records().iter().map(|r| r.name.clone()).collect();
    (names, manager.report().unwrap().resolution.passes)
}

#[tokio::test]
async fn test_hard_chain_order() {
    let (order, passes) = activation_order(vec![
        fixture::<Alpha>("A"),
        fixture::<Beta>("B").requires_key(key::<Alpha>()),
        fixture::<Gamma>("C").requires_key(key::<Beta>()),
    ])
    .await;
    assert_eq!(order, vec!["A", "B", "C"]);
    assert_eq!(passes, 1);
}

#[tokio::test]
async fn test_mutual_cycle_terminates_without_third_pass() {
    let (order, passes) = activation_order(vec![
        fixture::<Alpha>("A").requires_key(key::<Beta>()),
        fixture::<Beta>("B").requires_key(key::<Alpha>()),
    ])
    .await;
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(sorted, vec!["A", "B"]);
    assert!(passes < 3);
}

#[tokio::test]
async fn test_absent_soft_dependency_activates_first_pass() {
    let (order, passes) = activation_order(vec![fixture::<Alpha>("A").soft_requires("Z")]).await;
    assert_eq!(order, vec!["A"]);
    assert_eq!(passes, 1);
}

#[tokio::test]
async fn test_first_unsatisfied_hard_dependency_gates_each_pass() {
    // D waits on A, then on B; each is examined in its own pass
    let (order, passes) = activation_order(vec![
        fixture::<Delta>("D")
            .requires_key(key::<Alpha>())
            .requires_key(key::<Beta>()),
        fixture::<Beta>("B").requires_key(key::<Alpha>()),
        fixture::<Alpha>("A"),
    ])
    .await;
    assert_eq!(order, vec!["A", "B", "D"]);
    assert_eq!(passes, 3);
}

#[tokio::test]
async fn test_transitive_cycle_detection_from_config() {
    let mut config = config_for(None, false);
    config.cycle_detection = CycleDetection::Transitive;
    let mut manager = PluginManager::with_config(Arc::new(LifecycleEventBus::new()), config);
    manager.register_descriptor(fixture::<Alpha>("A").requires_key(key::<Beta>()));
    manager.register_descriptor(fixture::<Beta>("B").requires_key(key::<Gamma>()));
    manager.register_descriptor(fixture::<Gamma>("C").requires_key(key::<Alpha>()));

    assert_eq!(manager.load_plugins().await.unwrap(), 3);
    assert!(manager.report().unwrap().resolution.is_complete());
}
