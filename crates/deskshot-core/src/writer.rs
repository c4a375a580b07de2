//! Encode an image and persist it.
//!
//! Encoding happens entirely in memory. The bytes then go to a temporary file
//! next to the destination, which is renamed over it only once fully synced.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, ImageResult, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::EncodeError;
use crate::registry::{EncoderDescriptor, EncoderKind};

/// Quality used for trial encodes.
pub const DEFAULT_QUALITY: u8 = 75;

/// Clamp a caller-supplied quality into `0..=100`.
pub fn clamp_quality(quality: i32) -> u8 {
    if !(0..=100).contains(&quality) {
        warn!("[ImageWriter] quality {} outside 0..=100, clamping", quality);
    }
    quality.clamp(0, 100) as u8
}

pub(crate) fn encode_to_vec(
    image: &RgbImage,
    kind: EncoderKind,
    quality: Option<u8>,
) -> ImageResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match (kind, quality) {
        (EncoderKind::Jpeg, Some(q)) => {
            // JPEG's scale starts at 1.
            image.write_with_encoder(JpegEncoder::new_with_quality(&mut out, q.max(1)))?;
        }
        _ => image.write_to(&mut out, image_format(kind))?,
    }
    Ok(out.into_inner())
}

fn image_format(kind: EncoderKind) -> ImageFormat {
    match kind {
        EncoderKind::Png => ImageFormat::Png,
        EncoderKind::Jpeg => ImageFormat::Jpeg,
        EncoderKind::Bmp => ImageFormat::Bmp,
        EncoderKind::Gif => ImageFormat::Gif,
        EncoderKind::Tiff => ImageFormat::Tiff,
    }
}

/// Encode `image` with `descriptor` and write it to `path`.
///
/// `quality` is ignored unless the descriptor supports it. An existing file
/// at `path` is replaced atomically; on failure it is left as it was and no
/// partial file is left behind.
pub fn write(
    image: &RgbImage,
    descriptor: &EncoderDescriptor,
    quality: Option<u8>,
    path: &Path,
) -> Result<(), EncodeError> {
    let save_failed = |reason: String| EncodeError::SaveFailed {
        path: path.display().to_string(),
        reason,
    };

    let quality = quality.filter(|_| descriptor.supports_quality());
    let bytes = encode_to_vec(image, descriptor.kind(), quality)
        .map_err(|e| save_failed(format!("encode: {e}")))?;
    debug!(
        "[ImageWriter] encoded {}x{} as {} ({} bytes, quality={:?})",
        image.width(),
        image.height(),
        descriptor.content_type(),
        bytes.len(),
        quality
    );

    persist(path, &bytes).map_err(|e| save_failed(e.to_string()))?;

    info!("[ImageWriter] saved {}", path.display());
    Ok(())
}

fn persist(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Dropping the temp file on any early return deletes it.
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
