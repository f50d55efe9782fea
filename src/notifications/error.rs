//! Error types for the lifecycle event bus

use crate::notifications::event::LifecycleEventKind;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotificationError {
    #[error("Lifecycle event {kind} has already been raised")]
    AlreadyRaised { kind: LifecycleEventKind },

    #[error(
        "{} listener(s) failed while handling {kind}: {failed_listeners:?}",
        .failed_listeners.len()
    )]
    ListenerFailed {
        kind: LifecycleEventKind,
        failed_listeners: Vec<String>,
    },
}

impl crate::core::error_handling::ContextualError for NotificationError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}
