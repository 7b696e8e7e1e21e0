use std::sync::Mutex;

use crate::domain::notify::NotificationSink;
use crate::domain::types::Notification;

/// Keeps every notification until drained. Backs hosts that poll for
/// messages (FFI) and the tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
  seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Takes all notifications received so far, oldest first.
  pub fn drain(&self) -> Vec<Notification> {
    std::mem::take(&mut *self.lock())
  }

  pub fn snapshot(&self) -> Vec<Notification> {
    self.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // A panic while pushing cannot leave the Vec half-written.
  fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
    self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl NotificationSink for RecordingSink {
  fn notify(&self, notification: Notification) {
    self.lock().push(notification);
  }
}
