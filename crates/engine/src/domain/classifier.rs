// crates/engine/src/domain/classifier.rs

use std::future::Future;

use super::error::EngineResult;
use super::types::{PendingUpload, Verdict};

/// Trait implemented by detection backends (the HTTP `/predict` client today).
///
/// One call is one outbound request. Implementations return a validated
/// [`Verdict`] or the error that explains why none could be produced.
pub trait Classifier: Send + Sync {
    fn classify(&self, upload: &PendingUpload) -> impl Future<Output = EngineResult<Verdict>> + Send;
}
