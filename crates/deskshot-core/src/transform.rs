use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::RgbImage;
use tracing::{debug, warn};

use crate::errors::EncodeError;
use crate::types::{Resolution, ScreenCapture};

/// Bicubic kernel used for every resample.
pub const RESAMPLE_FILTER: FilterType = FilterType::CatmullRom;

/// Upper bound on the memory one resample may allocate.
pub const MAX_RESAMPLE_BYTES: u64 = 1 << 30;

// The vertical pass keeps an intermediate RGBA f32 buffer of src_width × target_height.
const INTERMEDIATE_BYTES_PER_PIXEL: u64 = 16;
const OUTPUT_BYTES_PER_PIXEL: u64 = 3;

/// Bytes a resample of a `src_width`-wide image to `target` allocates, or
/// `None` on overflow.
pub fn resample_bytes(src_width: u32, target: Resolution) -> Option<u64> {
    let output = target.total_pixels().checked_mul(OUTPUT_BYTES_PER_PIXEL)?;
    let intermediate = (src_width as u64)
        .checked_mul(target.height as u64)?
        .checked_mul(INTERMEDIATE_BYTES_PER_PIXEL)?;
    output.checked_add(intermediate)
}

/// Resample `capture` to `target`, or hand back its image untouched when the
/// size already matches.
///
/// Targets whose buffers would exceed [`MAX_RESAMPLE_BYTES`] fail with
/// [`EncodeError::TargetTooLarge`] before anything is allocated.
pub fn transform(
    capture: &ScreenCapture,
    target: Resolution,
) -> Result<Cow<'_, RgbImage>, EncodeError> {
    let src = capture.image();
    if src.width() == target.width && src.height() == target.height {
        debug!("[ImageTransformer] {} already at target size", target);
        return Ok(Cow::Borrowed(src));
    }

    match resample_bytes(src.width(), target) {
        Some(bytes) if bytes <= MAX_RESAMPLE_BYTES => {}
        bytes => {
            warn!(
                "[ImageTransformer] refusing {} resample ({:?} bytes, limit {})",
                target, bytes, MAX_RESAMPLE_BYTES
            );
            return Err(EncodeError::TargetTooLarge { target });
        }
    }

    debug!(
        "[ImageTransformer] resampling {}x{} → {} ({:?})",
        src.width(),
        src.height(),
        target,
        RESAMPLE_FILTER
    );
    Ok(Cow::Owned(imageops::resize(src, target.width, target.height, RESAMPLE_FILTER)))
}
