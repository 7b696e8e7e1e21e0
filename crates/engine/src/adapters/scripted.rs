//! Deterministic stand-in for the remote classifier.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::classifier::Classifier;
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::types::{PendingUpload, Verdict};

/// Replays queued outcomes in order, optionally after a fixed delay, and
/// counts calls. An exhausted queue yields a transport error.
#[derive(Debug, Default)]
pub struct ScriptedClassifier {
  outcomes: Mutex<VecDeque<EngineResult<Verdict>>>,
  delay: Option<Duration>,
  calls: AtomicUsize,
}

impl ScriptedClassifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn then(self, outcome: EngineResult<Verdict>) -> Self {
    self.push(outcome);
    self
  }

  pub fn push(&self, outcome: EngineResult<Verdict>) {
    self.queue().push_back(outcome);
  }

  /// Number of `classify` calls made so far.
  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<EngineResult<Verdict>>> {
    self.outcomes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Classifier for ScriptedClassifier {
  async fn classify(&self, _upload: &PendingUpload) -> EngineResult<Verdict> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    let next = self.queue().pop_front();
    next.unwrap_or_else(|| Err(EngineError::Transport("no scripted outcome left".into())))
  }
}
