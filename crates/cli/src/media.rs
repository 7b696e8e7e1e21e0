use std::path::Path;

use anyhow::{Context, Result};
use deepscan_engine::adapters::content_detection::claimed_media_type;
use deepscan_engine::ImageCandidate;

/// Reads `path` and claims a media type from its bytes (or extension).
pub async fn load_candidate(path: &Path) -> Result<ImageCandidate> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path.file_name().and_then(|n| n.to_str()).map(str::to_string);
    let media_type = claimed_media_type(&data, file_name.as_deref());
    tracing::debug!(path = %path.display(), media_type, size = data.len(), "loaded file");

    let candidate = ImageCandidate::new(data, media_type);
    Ok(match file_name {
        Some(name) => candidate.with_file_name(name),
        None => candidate,
    })
}
