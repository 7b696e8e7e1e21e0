// crates/engine/src/domain/preview.rs
use std::sync::Arc;

use super::error::EngineResult;
use super::types::PreviewRef;

/// Creates and releases display copies of selected images.
///
/// Every `PreviewRef` handed out by `create` is given back to `release`
/// exactly once by the workflow.
pub trait PreviewStore: Send + Sync {
    fn create(&self, data: &[u8], media_type: &str) -> EngineResult<PreviewRef>;
    fn release(&self, preview: PreviewRef);
}

impl<T: PreviewStore + ?Sized> PreviewStore for Arc<T> {
    fn create(&self, data: &[u8], media_type: &str) -> EngineResult<PreviewRef> {
        (**self).create(data, media_type)
    }

    fn release(&self, preview: PreviewRef) {
        (**self).release(preview)
    }
}
