//! Listener traits for the lifecycle event bus

use crate::notifications::event::LifecycleEvent;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Instant;

/// Result returned by a listener; errors are logged by the bus, never propagated
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Delivery statistics kept by the bus for each listener
#[derive(Debug)]
pub struct ListenerStatistics {
    events_handled: AtomicUsize,
    error_count: AtomicUsize,
    last_event_time: RwLock<Option<Instant>>,
}

impl Default for ListenerStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerStatistics {
    pub fn new() -> Self {
        Self {
            events_handled: AtomicUsize::new(0),
            error_count: AtomicUsize::new(0),
            last_event_time: RwLock::new(None),
        }
    }

    pub fn events_handled(&self) -> usize {
        self.events_handled.load(Ordering::Relaxed)
    }

    pub fn record_event_handled(&self) {
        self.events_handled.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut time) = self.last_event_time.write() {
            *time = Some(Instant::now());
        }
    }

    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    pub fn record_error(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn last_event_time(&self) -> Option<Instant> {
        *self.last_event_time.read().ok()?
    }
}

/// Something that reacts to lifecycle events.
///
/// A listener is registered for one event kind and only receives events of
/// that kind.
#[async_trait]
pub trait LifecycleListener: Send + Sync {
    /// Handle an incoming event
    async fn handle_event(&self, event: &LifecycleEvent) -> ListenerResult;

    /// Identifier used in diagnostics and statistics
    fn listener_id(&self) -> &str;
}

/// Adapter turning a closure into a [`LifecycleListener`]
pub struct FnListener<F> {
    id: String,
    handler: F,
}

impl<F> FnListener<F>
where
    F: Fn(&LifecycleEvent) -> ListenerResult + Send + Sync,
{
    pub fn new(id: impl Into<String>, handler: F) -> Self {
        Self {
            id: id.into(),
            handler,
        }
    }
}

#[async_trait]
impl<F> LifecycleListener for FnListener<F>
where
    F: Fn(&LifecycleEvent) -> ListenerResult + Send + Sync,
{
    async fn handle_event(&self, event: &LifecycleEvent) -> ListenerResult {
        (self.handler)(event)
    }

    fn listener_id(&self) -> &str {
        &self.id
    }
}
