use std::sync::{Arc, Mutex, MutexGuard};

use deepscan_engine::domain::error::EngineError;
use deepscan_engine::domain::types as dt;
use deepscan_engine::{
    Classifier, DetectionWorkflow, HttpClassifier, RecordingSink, TempDirPreviews,
};

uniffi::setup_scaffolding!();

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("{message}")]
    Generic { message: String },
}

impl From<EngineError> for FfiError {
    fn from(e: EngineError) -> Self {
        FfiError::Generic {
            message: e.user_message(),
        }
    }
}

// ===== FFI types mirroring the public Rust API (FFI-friendly) =====

#[derive(uniffi::Enum, Debug, Clone, Copy)]
pub enum FfiLabel { Real, Fake }

impl From<dt::Label> for FfiLabel {
    fn from(v: dt::Label) -> Self {
        match v { dt::Label::Authentic => FfiLabel::Real, dt::Label::Synthetic => FfiLabel::Fake }
    }
}

#[derive(uniffi::Enum, Debug, Clone, Copy)]
pub enum FfiPhase { Idle, FileSelected, Submitting, Completed, Failed }

impl From<dt::Phase> for FfiPhase {
    fn from(v: dt::Phase) -> Self {
        match v { dt::Phase::Idle => FfiPhase::Idle, dt::Phase::FileSelected => FfiPhase::FileSelected, dt::Phase::Submitting => FfiPhase::Submitting, dt::Phase::Completed => FfiPhase::Completed, dt::Phase::Failed => FfiPhase::Failed }
    }
}

#[derive(uniffi::Enum, Debug, Clone, Copy)]
pub enum FfiVariant { Default, Destructive }

#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiNotification {
    pub title: String,
    pub description: String,
    pub variant: FfiVariant,
}

impl From<dt::Notification> for FfiNotification {
    fn from(v: dt::Notification) -> Self {
        let variant = match v.variant { dt::Variant::Default => FfiVariant::Default, dt::Variant::Destructive => FfiVariant::Destructive };
        FfiNotification { title: v.title, description: v.description, variant }
    }
}

/// Verdict plus the banner text a shell should render.
#[derive(uniffi::Record, Debug, Clone)]
pub struct FfiVerdict {
    pub label: FfiLabel,
    pub score: Option<f64>,
    pub confidence_percent: Option<u32>,
    pub headline: String,
    pub summary: String,
}

impl From<&dt::Verdict> for FfiVerdict {
    fn from(v: &dt::Verdict) -> Self {
        FfiVerdict {
            label: v.label.into(),
            score: v.score,
            confidence_percent: v.confidence_percent(),
            headline: v.headline().to_string(),
            summary: v.summary(),
        }
    }
}

fn config_for(base_url: Option<String>) -> Result<dt::DetectionConfig, FfiError> {
    let cfg = match base_url {
        Some(url) => dt::DetectionConfig::new(url, dt::LimitsConfig::defaults())?,
        None => dt::DetectionConfig::from_env()?,
    };
    Ok(cfg)
}

fn candidate(data: Vec<u8>, media_type: String, file_name: Option<String>) -> dt::ImageCandidate {
    let c = dt::ImageCandidate::new(data, media_type);
    match file_name { Some(n) => c.with_file_name(n), None => c }
}

// ===== Session object =====

/// One detection workflow, driven from a host UI thread.
///
/// The request itself runs without holding the workflow lock, so `clear()`
/// from another thread takes effect immediately and the late result is
/// discarded. Selections made meanwhile are refused.
#[derive(uniffi::Object)]
pub struct DetectionSession {
    runtime: tokio::runtime::Runtime,
    classifier: HttpClassifier,
    sink: Arc<RecordingSink>,
    workflow: Mutex<DetectionWorkflow<HttpClassifier>>,
}

impl DetectionSession {
    fn workflow(&self) -> MutexGuard<'_, DetectionWorkflow<HttpClassifier>> {
        self.workflow.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[uniffi::export]
impl DetectionSession {
    /// `base_url` overrides `DEEPSCAN_API_URL` when given.
    #[uniffi::constructor]
    pub fn new(base_url: Option<String>) -> Result<Arc<Self>, FfiError> {
        let config = config_for(base_url)?;
        let classifier = HttpClassifier::new(&config)?;
        let sink = Arc::new(RecordingSink::new());
        let previews = Arc::new(TempDirPreviews::new()?);
        let workflow = DetectionWorkflow::new(classifier.clone(), config, sink.clone(), previews);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FfiError::Generic { message: format!("runtime: {e}") })?;
        Ok(Arc::new(Self { runtime, classifier, sink, workflow: Mutex::new(workflow) }))
    }

    pub fn select_file(&self, data: Vec<u8>, media_type: String, file_name: Option<String>) -> Result<(), FfiError> {
        self.workflow().select_file(candidate(data, media_type, file_name)).map_err(FfiError::from)
    }

    /// Drop-target selection; non-images are ignored without a notification.
    pub fn select_dropped(&self, data: Vec<u8>, media_type: String, file_name: Option<String>) -> bool {
        self.workflow().select_dropped(candidate(data, media_type, file_name))
    }

    /// Blocks until the classifier answers. Returns the verdict on success;
    /// failures are reported through notifications and `phase()`.
    pub fn submit(&self) -> Option<FfiVerdict> {
        let upload = self.workflow().begin_submit()?;
        let outcome = self.runtime.block_on(self.classifier.classify(&upload));
        let mut workflow = self.workflow();
        workflow.finish_submit(upload.ticket(), outcome);
        workflow.verdict().map(FfiVerdict::from)
    }

    pub fn clear(&self) {
        self.workflow().clear();
    }

    pub fn phase(&self) -> FfiPhase {
        self.workflow().phase().into()
    }

    pub fn is_analyzing(&self) -> bool {
        self.workflow().is_analyzing()
    }

    pub fn verdict(&self) -> Option<FfiVerdict> {
        self.workflow().verdict().map(FfiVerdict::from)
    }

    pub fn last_error(&self) -> Option<String> {
        self.workflow().last_error().map(str::to_string)
    }

    /// Filesystem path of the current preview image.
    pub fn preview_path(&self) -> Option<String> {
        self.workflow().preview().map(|p| p.location().display().to_string())
    }

    /// Notifications emitted since the last drain, oldest first.
    pub fn drain_notifications(&self) -> Vec<FfiNotification> {
        self.sink.drain().into_iter().map(Into::into).collect()
    }

    pub fn endpoint(&self) -> String {
        self.classifier.endpoint().to_string()
    }
}

// ===== High-level API, mirroring Rust surface =====

#[uniffi::export]
pub fn detect_image_ffi(base_url: Option<String>, data: Vec<u8>, media_type: String) -> Result<FfiVerdict, FfiError> {
    let config = config_for(base_url)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| FfiError::Generic { message: format!("runtime: {e}") })?;
    let verdict = runtime.block_on(deepscan_engine::detect_image(config, dt::ImageCandidate::new(data, media_type)))?;
    Ok(FfiVerdict::from(&verdict))
}

/// Media type to claim for raw bytes, from magic bytes or the file name.
#[uniffi::export]
pub fn claimed_media_type_ffi(data: Vec<u8>, file_name: Option<String>) -> String {
    deepscan_engine::adapters::content_detection::claimed_media_type(&data, file_name.as_deref()).to_string()
}
