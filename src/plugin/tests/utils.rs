//! Plugin Test Utilities
//!
//! A generic test plugin parameterised by a marker type, so each marker
//! yields a distinct concrete plugin type (and therefore a distinct
//! [`PluginKey`]).

use crate::notifications::api::LifecycleEventBus;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::Plugin;
use crate::plugin::types::{PluginDescriptor, PluginInfo, PluginKey};
use std::marker::PhantomData;

pub struct TestPlugin<M> {
    label: String,
    fail_enable: bool,
    _marker: PhantomData<fn() -> M>,
}

impl<M> TestPlugin<M> {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            fail_enable: false,
            _marker: PhantomData,
        }
    }
}

#[async_trait::async_trait]
impl<M: 'static> Plugin for TestPlugin<M> {
    fn plugin_info(&self) -> PluginInfo {
        PluginInfo::new(format!("{} Plugin", self.label)).with_version("1.0.0")
    }

    async fn on_enable(&self, _bus: &LifecycleEventBus) -> PluginResult<()> {
        if self.fail_enable {
            return Err(PluginError::ExecutionError {
                plugin_name: self.label.clone(),
                operation: "on_enable".to_string(),
                cause: "refused to start".to_string(),
            });
        }
        Ok(())
    }
}

pub struct A;
pub struct B;
pub struct C;
pub struct D;
pub struct E;
pub struct F;

pub fn key<M: 'static>() -> PluginKey {
    PluginKey::of::<TestPlugin<M>>()
}

/// Descriptor for `TestPlugin<M>` under candidate name `name`
pub fn descriptor<M: 'static>(name: &str) -> PluginDescriptor {
    let label = name.to_string();
    PluginDescriptor::of(move || Ok(TestPlugin::<M>::new(&label))).named(name)
}

/// Descriptor whose factory always fails
pub fn failing_descriptor<M: 'static>(name: &str) -> PluginDescriptor {
    let label = name.to_string();
    PluginDescriptor::of::<TestPlugin<M>, _>(move || {
        Err(PluginError::ExecutionError {
            plugin_name: label.clone(),
            operation: "new".to_string(),
            cause: "constructor panicked".to_string(),
        })
    })
    .named(name)
}

/// Descriptor whose instance fails in `on_enable`
pub fn failing_enable_descriptor<M: 'static>(name: &str) -> PluginDescriptor {
    let label = name.to_string();
    PluginDescriptor::of(move || {
        let mut plugin = TestPlugin::<M>::new(&label);
        plugin.fail_enable = true;
        Ok(plugin)
    })
    .named(name)
}
