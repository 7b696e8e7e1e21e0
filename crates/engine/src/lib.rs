// crates/engine/src/lib.rs

//! Public facade for the Deepscan engine.
//! Exposes the detection workflow and re-exports types for consumers (CLI, FFI).

pub mod adapters;
pub mod domain;

use std::sync::Arc;

// High-level helpers for the common "HTTP backend" path.
// These give hosts a simple entrypoint without wiring the seams by hand.

/// Workflow over the HTTP classifier, with temp-dir previews.
#[cfg(feature = "http")]
pub fn http_workflow(
    config: DetectionConfig,
    sink: Arc<dyn NotificationSink>,
) -> EngineResult<DetectionWorkflow<HttpClassifier>> {
    let classifier = HttpClassifier::new(&config)?;
    let previews = Arc::new(TempDirPreviews::new()?);
    Ok(DetectionWorkflow::new(classifier, config, sink, previews))
}

/// Selects `candidate`, submits it once, and returns the verdict or the
/// error that caused the attempt to fail.
#[cfg(feature = "http")]
pub async fn detect_image(config: DetectionConfig, candidate: ImageCandidate) -> EngineResult<Verdict> {
    let classifier = HttpClassifier::new(&config)?;
    detect_with(classifier, config, candidate).await
}

/// [`detect_image`] over any classifier. Notifications are discarded.
pub async fn detect_with<C: Classifier>(
    classifier: C,
    config: DetectionConfig,
    candidate: ImageCandidate,
) -> EngineResult<Verdict> {
    let sink = Arc::new(RecordingSink::new());
    let previews = Arc::new(TempDirPreviews::new()?);
    let mut workflow = DetectionWorkflow::new(classifier, config, sink, previews);
    workflow.select_file(candidate)?;
    let upload = workflow
        .begin_submit()
        .ok_or_else(|| EngineError::Validation("no image selected".into()))?;
    let outcome = workflow.classifier().classify(&upload).await;
    match outcome {
        Ok(verdict) => {
            workflow.finish_submit(upload.ticket(), Ok(verdict));
            Ok(verdict)
        }
        Err(e) => Err(e),
    }
}

// Re-exports for convenience
pub use adapters::notify::RecordingSink;
pub use adapters::preview_store::TempDirPreviews;
pub use adapters::scripted::ScriptedClassifier;
#[cfg(feature = "http")]
pub use adapters::http::{HealthStatus, HttpClassifier};
pub use domain::classifier::Classifier;
pub use domain::error::{EngineError, EngineResult};
pub use domain::notify::NotificationSink;
pub use domain::preview::PreviewStore;
pub use domain::types::{
    DetectionConfig, EngineDefaults, ImageCandidate, Label, LimitsConfig, Notification, PendingUpload, Phase,
    PreviewRef, Submission, Ticket, Variant, Verdict,
};
pub use domain::workflow::DetectionWorkflow;
