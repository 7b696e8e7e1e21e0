use std::time::Duration;

use crate::adapters::url_validation::validate_base_url;
use crate::domain::error::EngineResult;

/// Centralized defaults for the detection client.
/// All opinionated defaults should be defined here for consistency.
pub struct EngineDefaults;

impl EngineDefaults {
    // Endpoint defaults
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";
    pub const API_URL_ENV: &'static str = "DEEPSCAN_API_URL";
    pub const PREDICT_PATH: &'static str = "/predict";
    pub const HEALTH_PATH: &'static str = "/health";

    // Upload defaults
    pub const UPLOAD_FIELD: &'static str = "file"; // multipart field name the backend reads
    pub const FALLBACK_FILE_NAME: &'static str = "upload"; // backend rejects nameless parts
}

/// Per-workflow limits.
#[derive(Debug, Clone, Copy)]
pub struct LimitsConfig {
    /// Largest payload `select_file` accepts.
    pub max_upload_size: usize,
    pub connect_timeout_secs: u64,
    /// Whole-request budget, including inference time on the server.
    pub request_timeout_secs: u64,
}

impl LimitsConfig {
    /// Opinionated production defaults.
    pub fn defaults() -> Self {
        Self {
            max_upload_size: 32 * 1024 * 1024, // 32 MB
            connect_timeout_secs: 10,
            request_timeout_secs: 120,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Endpoint configuration, injected into the workflow at construction.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    base_url: String,
    pub limits: LimitsConfig,
}

impl DetectionConfig {
    /// Validates `base_url` (http/https with a host).
    pub fn new(base_url: impl Into<String>, limits: LimitsConfig) -> EngineResult<Self> {
        let base_url = base_url.into().trim().to_string();
        validate_base_url(&base_url)?;
        Ok(Self { base_url, limits })
    }

    /// Reads [`EngineDefaults::API_URL_ENV`] from the process environment.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit lookup. An unset or
    /// blank value falls back to [`EngineDefaults::DEFAULT_BASE_URL`].
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(EngineDefaults::API_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| EngineDefaults::DEFAULT_BASE_URL.to_string());
        Self::new(base_url, LimitsConfig::defaults())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST` target for predictions.
    pub fn endpoint(&self) -> String {
        join_path(&self.base_url, EngineDefaults::PREDICT_PATH)
    }

    pub fn health_endpoint(&self) -> String {
        join_path(&self.base_url, EngineDefaults::HEALTH_PATH)
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            base_url: EngineDefaults::DEFAULT_BASE_URL.to_string(),
            limits: LimitsConfig::defaults(),
        }
    }
}

/// Strips a single trailing `/` from `base` before appending `path`.
fn join_path(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}{path}")
}
