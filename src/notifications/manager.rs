//! LifecycleEventBus implementation
//!
//! Listeners are keyed by event kind and delivered to in registration order.
//! [`LifecycleEventBus::publish`] completes delivery before it returns.
//! [`LifecycleEventBus::publish_detached`] hands delivery to a tokio task and
//! returns immediately; there is no ordering guarantee between a detached
//! delivery and anything the caller does afterwards.

use crate::notifications::error::NotificationError;
use crate::notifications::event::{LifecycleEvent, LifecycleEventKind};
use crate::notifications::traits::{
    FnListener, LifecycleListener, ListenerResult, ListenerStatistics,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::task::JoinHandle;

/// How the detached path delivers events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Spawn delivery onto the current tokio runtime
    #[default]
    Detached,
    /// Deliver inline; the caller waits for every listener
    Synchronous,
}

#[derive(Clone)]
struct ListenerEntry {
    listener: Arc<dyn LifecycleListener>,
    statistics: Arc<ListenerStatistics>,
}

pub struct LifecycleEventBus {
    listeners: RwLock<HashMap<LifecycleEventKind, Vec<ListenerEntry>>>,
    raised: Mutex<HashSet<LifecycleEventKind>>,
    detached: Mutex<Vec<JoinHandle<()>>>,
    mode: DispatchMode,
}

impl std::fmt::Debug for LifecycleEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<_, _> = listeners.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("LifecycleEventBus")
            .field("listeners", &counts)
            .field("mode", &self.mode)
            .finish()
    }
}

impl Default for LifecycleEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleEventBus {
    pub fn new() -> Self {
        Self::with_mode(DispatchMode::Detached)
    }

    pub fn with_mode(mode: DispatchMode) -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            raised: Mutex::new(HashSet::new()),
            detached: Mutex::new(Vec::new()),
            mode,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Register a listener for one event kind.
    ///
    /// Safe to call from inside a listener; the new registration applies to
    /// the next event raised.
    pub fn subscribe(&self, kind: LifecycleEventKind, listener: Arc<dyn LifecycleListener>) {
        log::trace!(
            "Listener '{}' subscribed to {}",
            listener.listener_id(),
            kind
        );
        let entry = ListenerEntry {
            listener,
            statistics: Arc::new(ListenerStatistics::new()),
        };
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(entry);
    }

    /// Register a closure for one event kind
    pub fn subscribe_fn<F>(&self, kind: LifecycleEventKind, listener_id: impl Into<String>, handler: F)
    where
        F: Fn(&LifecycleEvent) -> ListenerResult + Send + Sync + 'static,
    {
        self.subscribe(kind, Arc::new(FnListener::new(listener_id, handler)));
    }

    /// An empty bus in the same mode, for collecting subscriptions that may
    /// still be discarded.
    ///
    /// Listeners subscribed to the staged bus reach this bus only through
    /// [`LifecycleEventBus::commit`]; dropping the staged bus discards them.
    pub fn stage(&self) -> LifecycleEventBus {
        Self::with_mode(self.mode)
    }

    /// Move every listener of `staged` onto this bus, after the listeners
    /// already registered for the same kind. Returns the number moved.
    pub fn commit(&self, staged: LifecycleEventBus) -> usize {
        let staged = staged
            .listeners
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut moved = 0;
        for (kind, entries) in staged {
            moved += entries.len();
            listeners.entry(kind).or_default().extend(entries);
        }
        moved
    }

    pub fn listener_count(&self, kind: LifecycleEventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn has_listener(&self, listener_id: &str) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .any(|entry| entry.listener.listener_id() == listener_id)
    }

    /// Statistics of the first listener registered under `listener_id`
    pub fn listener_statistics(&self, listener_id: &str) -> Option<Arc<ListenerStatistics>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .flatten()
            .find(|entry| entry.listener.listener_id() == listener_id)
            .map(|entry| entry.statistics.clone())
    }

    /// Whether an event of this kind has been raised on this bus
    pub fn has_raised(&self, kind: LifecycleEventKind) -> bool {
        self.raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&kind)
    }

    /// Deliver an event to every listener of its kind before returning.
    ///
    /// Returns the number of listeners that handled it without error. Every
    /// listener is called even if an earlier one fails; failures are
    /// reported together afterwards.
    pub async fn publish(&self, event: LifecycleEvent) -> Result<usize, NotificationError> {
        let kind = event.kind();
        self.mark_raised(kind)?;
        let entries = self.snapshot(kind);
        log::debug!("Raising {} to {} listener(s)", kind, entries.len());
        deliver(&entries, &event).await
    }

    /// Deliver an event without waiting for listeners.
    ///
    /// Falls back to inline delivery in [`DispatchMode::Synchronous`] or when
    /// no tokio runtime is running.
    pub async fn publish_detached(&self, event: LifecycleEvent) -> Result<(), NotificationError> {
        let kind = event.kind();
        self.mark_raised(kind)?;
        let entries = self.snapshot(kind);

        let runtime = match self.mode {
            DispatchMode::Detached => tokio::runtime::Handle::try_current().ok(),
            DispatchMode::Synchronous => None,
        };

        match runtime {
            Some(handle) => {
                log::trace!("Raising {} detached to {} listener(s)", kind, entries.len());
                let task = handle.spawn(async move {
                    let _ = deliver(&entries, &event).await;
                });
                self.detached
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(task);
                Ok(())
            }
            None => deliver(&entries, &event).await.map(|_| ()),
        }
    }

    /// Wait until every detached delivery started so far has finished.
    ///
    /// Returns the number of deliveries awaited.
    pub async fn wait_detached(&self) -> usize {
        let tasks: Vec<JoinHandle<()>> = std::mem::take(
            &mut *self
                .detached
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        let count = tasks.len();
        for result in futures::future::join_all(tasks).await {
            if let Err(e) = result {
                log::error!("Detached lifecycle delivery did not complete: {}", e);
            }
        }
        count
    }

    fn mark_raised(&self, kind: LifecycleEventKind) -> Result<(), NotificationError> {
        let mut raised = self.raised.lock().unwrap_or_else(PoisonError::into_inner);
        if !raised.insert(kind) && !kind.is_repeatable() {
            return Err(NotificationError::AlreadyRaised { kind });
        }
        Ok(())
    }

    fn snapshot(&self, kind: LifecycleEventKind) -> Vec<ListenerEntry> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

async fn deliver(
    entries: &[ListenerEntry],
    event: &LifecycleEvent,
) -> Result<usize, NotificationError> {
    let mut failed_listeners = Vec::new();

    for entry in entries {
        let listener_id = entry.listener.listener_id();
        match entry.listener.handle_event(event).await {
            Ok(()) => entry.statistics.record_event_handled(),
            Err(e) => {
                entry.statistics.record_error();
                log::warn!(
                    "Listener '{}' failed while handling {}: {}",
                    listener_id,
                    event.kind(),
                    e
                );
                failed_listeners.push(listener_id.to_string());
            }
        }
    }

    if failed_listeners.is_empty() {
        Ok(entries.len())
    } else {
        Err(NotificationError::ListenerFailed {
            kind: event.kind(),
            failed_listeners,
        })
    }
}
