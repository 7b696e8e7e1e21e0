// crates/engine/src/domain/workflow.rs

//! Detection workflow controller.
//!
//! Owns one image-verification attempt at a time: selection and validation,
//! preview lifetime, the single classifier call, and the resulting
//! notification. All transitions take `&mut self`.
//!
//! Hosts with their own event loop can use [`DetectionWorkflow::begin_submit`]
//! and [`DetectionWorkflow::finish_submit`] to run the request elsewhere.
//! While a request is in flight only `clear()` may change the state; a result
//! that arrives after it carries a stale ticket and is dropped.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::classifier::Classifier;
use super::error::{EngineError, EngineResult};
use super::notify::NotificationSink;
use super::preview::PreviewStore;
use super::types::{
    DetectionConfig, ImageCandidate, Label, Notification, PendingUpload, Phase, PreviewRef,
    Submission, Ticket, Verdict,
};

const INVALID_TYPE_TITLE: &str = "Invalid file type";
const INVALID_TYPE_MESSAGE: &str = "Please select an image file";
const TOO_LARGE_TITLE: &str = "File too large";
const PREVIEW_FAILED_TITLE: &str = "Preview unavailable";
const DETECTION_FAILED_TITLE: &str = "Detection failed";
const BUSY_MESSAGE: &str = "A detection is already in progress";

enum State {
    Idle,
    FileSelected(Submission),
    Submitting {
        submission: Submission,
        ticket: Ticket,
    },
    Completed {
        submission: Submission,
        verdict: Verdict,
    },
    Failed {
        submission: Submission,
        message: String,
    },
}

impl State {
    fn phase(&self) -> Phase {
        match self {
            State::Idle => Phase::Idle,
            State::FileSelected(_) => Phase::FileSelected,
            State::Submitting { .. } => Phase::Submitting,
            State::Completed { .. } => Phase::Completed,
            State::Failed { .. } => Phase::Failed,
        }
    }

    fn submission(&self) -> Option<&Submission> {
        match self {
            State::Idle => None,
            State::FileSelected(submission)
            | State::Submitting { submission, .. }
            | State::Completed { submission, .. }
            | State::Failed { submission, .. } => Some(submission),
        }
    }

    fn into_submission(self) -> Option<Submission> {
        match self {
            State::Idle => None,
            State::FileSelected(submission)
            | State::Submitting { submission, .. }
            | State::Completed { submission, .. }
            | State::Failed { submission, .. } => Some(submission),
        }
    }
}

pub struct DetectionWorkflow<C> {
    classifier: C,
    config: DetectionConfig,
    sink: Arc<dyn NotificationSink>,
    previews: Arc<dyn PreviewStore>,
    state: State,
    last_ticket: u64,
}

impl<C: Classifier> DetectionWorkflow<C> {
    pub fn new(
        classifier: C,
        config: DetectionConfig,
        sink: Arc<dyn NotificationSink>,
        previews: Arc<dyn PreviewStore>,
    ) -> Self {
        Self {
            classifier,
            config,
            sink,
            previews,
            state: State::Idle,
            last_ticket: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Mirrors the UI's loading flag.
    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, State::Submitting { .. })
    }

    /// Present only while the phase is `Completed`.
    pub fn verdict(&self) -> Option<&Verdict> {
        match &self.state {
            State::Completed { verdict, .. } => Some(verdict),
            _ => None,
        }
    }

    /// Description of the last failure, while the phase is `Failed`.
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn submission(&self) -> Option<&Submission> {
        self.state.submission()
    }

    pub fn preview(&self) -> Option<&PreviewRef> {
        self.state.submission().map(Submission::preview)
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Selects `candidate` as the image to verify.
    ///
    /// A candidate whose claimed type is not `image/*`, or which exceeds the
    /// upload limit, is rejected with one notification and leaves the state
    /// untouched. Otherwise any prior submission and its preview are released
    /// and the phase becomes `FileSelected`.
    ///
    /// Refused without a notification while a submission is in flight.
    pub fn select_file(&mut self, candidate: ImageCandidate) -> EngineResult<()> {
        if self.is_analyzing() {
            debug!("selection ignored while submitting");
            return Err(EngineError::Validation(BUSY_MESSAGE.to_string()));
        }
        if !candidate.is_image() {
            debug!(media_type = %candidate.media_type, "rejected non-image selection");
            self.sink
                .notify(Notification::destructive(INVALID_TYPE_TITLE, INVALID_TYPE_MESSAGE));
            return Err(EngineError::Validation(INVALID_TYPE_MESSAGE.to_string()));
        }

        let max = self.config.limits.max_upload_size;
        if candidate.data.len() > max {
            let message = format!(
                "Image is {} bytes; the limit is {} bytes",
                candidate.data.len(),
                max
            );
            debug!(size = candidate.data.len(), max, "rejected oversized selection");
            self.sink
                .notify(Notification::destructive(TOO_LARGE_TITLE, message.clone()));
            return Err(EngineError::Validation(message));
        }

        let preview = match self.previews.create(&candidate.data, &candidate.media_type) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "could not create preview");
                self.sink
                    .notify(Notification::destructive(PREVIEW_FAILED_TITLE, e.user_message()));
                return Err(e);
            }
        };

        self.discard();
        let submission = Submission::new(candidate, preview);
        debug!(
            file = submission.file_name(),
            media_type = submission.media_type(),
            size = submission.data().len(),
            "file selected"
        );
        self.state = State::FileSelected(submission);
        Ok(())
    }

    /// Drop-target variant of [`select_file`](Self::select_file): non-images
    /// are ignored without a notification. Returns whether the file was taken.
    pub fn select_dropped(&mut self, candidate: ImageCandidate) -> bool {
        if self.is_analyzing() {
            debug!("drop ignored while submitting");
            return false;
        }
        if !candidate.is_image() {
            debug!(media_type = %candidate.media_type, "ignored non-image drop");
            return false;
        }
        self.select_file(candidate).is_ok()
    }

    /// Starts a submission and returns what must be sent.
    ///
    /// Returns `None` (and changes nothing) unless the phase is
    /// `FileSelected`, `Completed` or `Failed`.
    pub fn begin_submit(&mut self) -> Option<PendingUpload> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::FileSelected(submission)
            | State::Completed { submission, .. }
            | State::Failed { submission, .. } => {
                self.last_ticket += 1;
                let ticket = Ticket(self.last_ticket);
                let upload = submission.upload(ticket);
                self.state = State::Submitting { submission, ticket };
                Some(upload)
            }
            other => {
                debug!(phase = %other.phase(), "submit ignored");
                self.state = other;
                None
            }
        }
    }

    /// Applies the outcome of the attempt identified by `ticket`.
    ///
    /// Returns `false` when the outcome is stale, i.e. the workflow is no
    /// longer waiting on that ticket. Stale outcomes change nothing and
    /// emit nothing.
    pub fn finish_submit(&mut self, ticket: Ticket, outcome: EngineResult<Verdict>) -> bool {
        let submission = match std::mem::replace(&mut self.state, State::Idle) {
            State::Submitting {
                submission,
                ticket: current,
            } if current == ticket => submission,
            other => {
                warn!(ticket = ticket.get(), phase = %other.phase(), "discarding stale detection result");
                self.state = other;
                return false;
            }
        };

        match outcome {
            Ok(verdict) => {
                info!(label = verdict.label.as_wire(), score = ?verdict.score, "detection complete");
                self.sink.notify(success_notification(&verdict));
                self.state = State::Completed {
                    submission,
                    verdict,
                };
            }
            Err(e) => {
                error!(error = %e, "detection error");
                let message = e.user_message();
                self.sink
                    .notify(Notification::destructive(DETECTION_FAILED_TITLE, message.clone()));
                self.state = State::Failed {
                    submission,
                    message,
                };
            }
        }
        true
    }

    /// Sends the selected image to the classifier and applies the result.
    ///
    /// A no-op outside `FileSelected`, `Completed` and `Failed`, including
    /// while a previous submission is still in flight.
    pub async fn submit(&mut self) -> Phase {
        let Some(upload) = self.begin_submit() else {
            return self.phase();
        };
        info!(file = upload.file_name(), size = upload.data().len(), "submitting image");
        let outcome = self.classifier.classify(&upload).await;
        self.finish_submit(upload.ticket(), outcome);
        self.phase()
    }

    /// Returns to `Idle` from any phase, releasing the preview.
    pub fn clear(&mut self) {
        if self.discard() {
            debug!("workflow cleared");
        }
    }
}

impl<C> DetectionWorkflow<C> {
    /// Releases the current submission's preview and resets to `Idle`.
    fn discard(&mut self) -> bool {
        match std::mem::replace(&mut self.state, State::Idle).into_submission() {
            Some(submission) => {
                self.previews.release(submission.into_preview());
                true
            }
            None => false,
        }
    }
}

impl<C> Drop for DetectionWorkflow<C> {
    fn drop(&mut self) {
        self.discard();
    }
}

fn success_notification(verdict: &Verdict) -> Notification {
    let suffix = verdict
        .confidence_percent()
        .map(|pct| format!(" (confidence {pct}%)"))
        .unwrap_or_default();
    match verdict.label {
        Label::Authentic => Notification::info(
            "Analysis Complete",
            format!("This image appears to be authentic{suffix}"),
        ),
        Label::Synthetic => Notification::info(
            "Deepfake Detected",
            format!("This image may be AI-generated{suffix}"),
        ),
    }
}
