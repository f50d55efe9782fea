//! Plugin Trait
//!
//! Every extension implements [`Plugin`]. A plugin is constructed once by its
//! descriptor's factory, enabled, and then attaches behaviour to host
//! subsystems by subscribing to lifecycle events on the bus it receives in
//! [`Plugin::on_enable`].

use crate::notifications::api::LifecycleEventBus;
use crate::plugin::error::PluginResult;
use crate::plugin::types::PluginInfo;

#[async_trait::async_trait]
pub trait Plugin: Send + Sync {
    /// Get plugin metadata
    fn plugin_info(&self) -> PluginInfo;

    /// Called once, right after construction and before the plugin is
    /// recorded as active. Subscribe to lifecycle events here; if this
    /// returns an error, none of those subscriptions take effect.
    async fn on_enable(&self, _bus: &LifecycleEventBus) -> PluginResult<()> {
        Ok(())
    }
}
