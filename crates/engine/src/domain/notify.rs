// crates/engine/src/domain/notify.rs
use std::sync::Arc;

use super::types::Notification;

/// Receives user-facing notifications from the workflow.
///
/// Emission is a side effect; the workflow never reads anything back.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}
