use std::path::{Path, PathBuf};

use bytes::Bytes;

use super::config::EngineDefaults;

/// A file offered to the workflow, with the media type its source claims.
///
/// The claimed type is what validation looks at; the bytes are not sniffed.
/// `data` is reference-counted so handing it to the classifier does not copy.
#[derive(Clone)]
pub struct ImageCandidate {
    pub data: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl ImageCandidate {
    pub fn new(data: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// True when the claimed media type is in the `image/*` family.
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

impl std::fmt::Debug for ImageCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCandidate")
            .field("data_len", &self.data.len())
            .field("media_type", &self.media_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.trim().to_ascii_lowercase().starts_with("image/")
}

/// Identifies one submission attempt. A result is only applied if its ticket
/// still matches the attempt in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Display-only handle to a rendered copy of the selected image.
///
/// Not `Clone`: there is exactly one owner, and giving it back to the
/// [`PreviewStore`](crate::domain::preview::PreviewStore) releases it.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewRef {
    id: u64,
    location: PathBuf,
}

impl PreviewRef {
    pub fn new(id: u64, location: impl Into<PathBuf>) -> Self {
        Self {
            id,
            location: location.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn location(&self) -> &Path {
        &self.location
    }
}

/// The image currently owned by the workflow, plus its preview.
#[derive(Debug)]
pub struct Submission {
    data: Bytes,
    media_type: String,
    file_name: String,
    preview: PreviewRef,
}

impl Submission {
    pub(crate) fn new(candidate: ImageCandidate, preview: PreviewRef) -> Self {
        let file_name = candidate
            .file_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| EngineDefaults::FALLBACK_FILE_NAME.to_string());
        Self {
            data: candidate.data,
            media_type: candidate.media_type,
            file_name,
            preview,
        }
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn preview(&self) -> &PreviewRef {
        &self.preview
    }

    pub(crate) fn into_preview(self) -> PreviewRef {
        self.preview
    }

    pub(crate) fn upload(&self, ticket: Ticket) -> PendingUpload {
        PendingUpload {
            ticket,
            data: self.data.clone(),
            media_type: self.media_type.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

/// What a [`Classifier`](crate::domain::classifier::Classifier) receives for one attempt.
#[derive(Clone)]
pub struct PendingUpload {
    ticket: Ticket,
    data: Bytes,
    media_type: String,
    file_name: String,
}

impl PendingUpload {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl std::fmt::Debug for PendingUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingUpload")
            .field("ticket", &self.ticket)
            .field("data_len", &self.data.len())
            .field("media_type", &self.media_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_family_check() {
        assert!(is_image_media_type("image/png"));
        assert!(is_image_media_type("IMAGE/JPEG"));
        assert!(is_image_media_type("image/svg+xml"));
        assert!(!is_image_media_type("application/pdf"));
        assert!(!is_image_media_type(""));
        assert!(!is_image_media_type("video/mp4"));
    }

    #[test]
    fn blank_file_name_falls_back() {
        let c = ImageCandidate::new(vec![1u8, 2, 3], "image/png").with_file_name("  ");
        let s = Submission::new(c, PreviewRef::new(1, "/tmp/p"));
        assert_eq!(s.file_name(), EngineDefaults::FALLBACK_FILE_NAME);
    }
}
