use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::domain::error::EngineResult;
use crate::domain::preview::PreviewStore;
use crate::domain::types::PreviewRef;
use super::content_detection::preview_extension;

/// Writes previews into a private temporary directory.
///
/// Each preview is a file named `preview-<id>.<ext>`; `release` deletes it.
/// Anything still present is removed when the store is dropped.
pub struct TempDirPreviews {
  dir: TempDir,
  next_id: AtomicU64,
}

impl TempDirPreviews {
  pub fn new() -> EngineResult<Self> {
    let dir = tempfile::Builder::new().prefix("deepscan-preview-").tempdir()?;
    Ok(Self { dir, next_id: AtomicU64::new(1) })
  }

  pub fn dir(&self) -> &Path {
    self.dir.path()
  }
}

impl PreviewStore for TempDirPreviews {
  fn create(&self, data: &[u8], media_type: &str) -> EngineResult<PreviewRef> {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    let filename = match preview_extension(data, media_type) {
      Some(ext) => format!("preview-{id}.{ext}"),
      None => format!("preview-{id}"),
    };
    let path = self.dir.path().join(filename);
    std::fs::write(&path, data)?;
    debug!(id, path = %path.display(), "preview created");
    Ok(PreviewRef::new(id, path))
  }

  fn release(&self, preview: PreviewRef) {
    match std::fs::remove_file(preview.location()) {
      Ok(()) => debug!(id = preview.id(), "preview released"),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(e) => warn!(id = preview.id(), error = %e, "failed to remove preview"),
    }
  }
}
