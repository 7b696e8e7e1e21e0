use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::domain::classifier::Classifier;
use crate::domain::error::{EngineError, EngineResult};
use crate::domain::types::{DetectionConfig, EngineDefaults, PendingUpload, Verdict};
use super::wire::{parse_prediction, HealthStatus};

/// `Classifier` backed by `POST {base}/predict`.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
  client: reqwest::Client,
  endpoint: String,
  health_endpoint: String,
}

impl HttpClassifier {
  pub fn new(config: &DetectionConfig) -> EngineResult<Self> {
    let client = reqwest::Client::builder()
      .connect_timeout(config.limits.connect_timeout())
      .timeout(config.limits.request_timeout())
      .build()
      .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {e}")))?;
    Ok(Self {
      client,
      endpoint: config.endpoint(),
      health_endpoint: config.health_endpoint(),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  /// Probes `GET {base}/health`.
  pub async fn health(&self) -> EngineResult<HealthStatus> {
    let response = self.client.get(&self.health_endpoint).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(EngineError::Server { status: status.as_u16(), message: body });
    }
    serde_json::from_str(&body)
      .map_err(|e| EngineError::Protocol(format!("malformed health body: {e}")))
  }

  fn upload_part(upload: &PendingUpload) -> Part {
    let part = || Part::bytes(upload.data().to_vec()).file_name(upload.file_name().to_string());
    match part().mime_str(upload.media_type()) {
      Ok(p) => p,
      Err(e) => {
        warn!(media_type = upload.media_type(), error = %e, "unparseable media type; sending without one");
        part()
      }
    }
  }
}

impl Classifier for HttpClassifier {
  async fn classify(&self, upload: &PendingUpload) -> EngineResult<Verdict> {
    let form = Form::new().part(EngineDefaults::UPLOAD_FIELD, Self::upload_part(upload));
    debug!(endpoint = %self.endpoint, ticket = upload.ticket().get(), "POST prediction");

    let response = self.client.post(&self.endpoint).multipart(form).send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!(status = status.as_u16(), len = body.len(), "prediction response");

    if !status.is_success() {
      return Err(EngineError::Server { status: status.as_u16(), message: body });
    }
    parse_prediction(&body)
  }
}
