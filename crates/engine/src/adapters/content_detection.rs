//! Magic-byte sniffing for selected files.
//!
//! The workflow validates the *claimed* media type. These helpers are for
//! hosts that need to produce a claim from raw bytes (the CLI, the FFI
//! shells) and for naming preview files.

/// Container formats recognized by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedFormat {
  Jpeg,
  Png,
  Gif,
  Webp,
  Bmp,
  Tiff,
  Heic,
  Heif,
  Avif,
  Svg,
  Pdf,
  Mp4,
  Mov,
  Wav,
  Mp3,
}

impl SniffedFormat {
  pub fn extension(self) -> &'static str {
    match self {
      SniffedFormat::Jpeg => "jpg",
      SniffedFormat::Png => "png",
      SniffedFormat::Gif => "gif",
      SniffedFormat::Webp => "webp",
      SniffedFormat::Bmp => "bmp",
      SniffedFormat::Tiff => "tiff",
      SniffedFormat::Heic => "heic",
      SniffedFormat::Heif => "heif",
      SniffedFormat::Avif => "avif",
      SniffedFormat::Svg => "svg",
      SniffedFormat::Pdf => "pdf",
      SniffedFormat::Mp4 => "mp4",
      SniffedFormat::Mov => "mov",
      SniffedFormat::Wav => "wav",
      SniffedFormat::Mp3 => "mp3",
    }
  }

  pub fn media_type(self) -> &'static str {
    extension_to_mime_type(self.extension())
  }
}

pub fn sniff_format(data: &[u8]) -> Option<SniffedFormat> {
  if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
    return Some(SniffedFormat::Jpeg);
  }
  if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
    return Some(SniffedFormat::Png);
  }
  if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
    return Some(SniffedFormat::Gif);
  }
  if data.len() >= 12 && &data[..4] == b"RIFF" {
    match &data[8..12] {
      b"WEBP" => return Some(SniffedFormat::Webp),
      b"WAVE" => return Some(SniffedFormat::Wav),
      _ => {}
    }
  }
  if data.starts_with(b"BM") && data.len() >= 14 {
    return Some(SniffedFormat::Bmp);
  }
  if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
    return Some(SniffedFormat::Tiff);
  }

  // ISO-BMFF: brand follows the ftyp box tag
  if data.len() >= 12 && &data[4..8] == b"ftyp" {
    return Some(match &data[8..12] {
      b"heic" | b"heix" => SniffedFormat::Heic,
      b"heif" | b"mif1" => SniffedFormat::Heif,
      b"avif" => SniffedFormat::Avif,
      b"qt  " => SniffedFormat::Mov,
      _ => SniffedFormat::Mp4,
    });
  }

  if data.starts_with(b"%PDF-") {
    return Some(SniffedFormat::Pdf);
  }

  if data.first() == Some(&b'<') {
    let head = &data[..data.len().min(512)];
    if let Ok(s) = std::str::from_utf8(head) {
      if s.to_ascii_lowercase().contains("<svg") {
        return Some(SniffedFormat::Svg);
      }
    }
  }

  if data.starts_with(b"ID3") {
    return Some(SniffedFormat::Mp3);
  }
  if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
    return Some(SniffedFormat::Mp3);
  }

  None
}

/// Extension to use for a preview file, from bytes first and the claimed
/// media type second.
pub fn preview_extension(data: &[u8], media_type: &str) -> Option<&'static str> {
  if let Some(fmt) = sniff_format(data) {
    return Some(fmt.extension());
  }
  match media_type.trim().to_ascii_lowercase().as_str() {
    "image/jpeg" | "image/jpg" => Some("jpg"),
    "image/png" => Some("png"),
    "image/gif" => Some("gif"),
    "image/webp" => Some("webp"),
    "image/bmp" => Some("bmp"),
    "image/tiff" => Some("tiff"),
    "image/svg+xml" => Some("svg"),
    _ => None,
  }
}

/// Convert file extension to MIME type.
pub fn extension_to_mime_type(extension: &str) -> &'static str {
  match extension.to_ascii_lowercase().as_str() {
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "tiff" | "tif" => "image/tiff",
    "heic" => "image/heic",
    "heif" => "image/heif",
    "avif" => "image/avif",
    "svg" => "image/svg+xml",
    "pdf" => "application/pdf",
    "mp4" => "video/mp4",
    "mov" => "video/quicktime",
    "wav" => "audio/wav",
    "mp3" => "audio/mpeg",
    "txt" => "text/plain",
    _ => "application/octet-stream",
  }
}

/// Media type a host should claim for `data`. Falls back to the file
/// extension of `file_name` when the bytes are not recognized.
pub fn claimed_media_type(data: &[u8], file_name: Option<&str>) -> &'static str {
  if let Some(fmt) = sniff_format(data) {
    return fmt.media_type();
  }
  file_name
    .and_then(|n| std::path::Path::new(n).extension())
    .and_then(|e| e.to_str())
    .map(extension_to_mime_type)
    .unwrap_or("application/octet-stream")
}
