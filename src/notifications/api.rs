//! Public API for the lifecycle event bus
//!
//! External modules should import from here rather than directly from
//! internal modules. There is no global bus: the host constructs one and
//! hands it out by `Arc`.

pub use crate::notifications::error::NotificationError;
pub use crate::notifications::event::{LifecycleEvent, LifecycleEventKind};
pub use crate::notifications::manager::{DispatchMode, LifecycleEventBus};
pub use crate::notifications::traits::{
    FnListener, LifecycleListener, ListenerResult, ListenerStatistics,
};
