//! deskshot — caller-facing entry points.
//!
//! These are the three operations a scripting host binds:
//!
//! | Function | Returns |
//! |---|---|
//! | [`display_width`] | display width in pixels, `-1` if unavailable |
//! | [`display_height`] | display height in pixels, `-1` if unavailable |
//! | [`take_screenshot`] | a [`ResultCode`] integer (`0` on success) |
//!
//! ```rust,no_run
//! let code = deskshot::take_screenshot("image/jpeg", "out.jpg", 80, 800, 600)?;
//! println!("{}", deskshot::ResultCode::describe_code(code));
//! # Ok::<(), deskshot::ArgumentError>(())
//! ```

pub mod args;

use std::path::Path;

use deskshot_capture_windows::default_capturer;
use deskshot_core::capture::{height_or_unavailable, width_or_unavailable};
use deskshot_core::{DisplayCapturer, EncodeRequest, ImageEncoderRegistry, PipelineOrchestrator};

pub use args::ScreenshotArgs;
pub use deskshot_core::{ArgumentError, ResultCode, ScreenshotConfig};

/// Current display width, or `-1` when the platform has no display capability.
pub fn display_width() -> i32 {
    width_or_unavailable(&default_capturer())
}

/// Current display height, or `-1` when the platform has no display capability.
pub fn display_height() -> i32 {
    height_or_unavailable(&default_capturer())
}

/// Capture the display, resize it to `width × height` and save it to `path`.
///
/// Returns the integer result code; only malformed arguments are an `Err`.
pub fn take_screenshot(
    content_type: &str,
    path: impl AsRef<Path>,
    quality: i32,
    width: i32,
    height: i32,
) -> Result<i32, ArgumentError> {
    take_screenshot_with(default_capturer(), content_type, path, quality, width, height)
}

/// [`take_screenshot`] against an explicit capture backend.
pub fn take_screenshot_with<C: DisplayCapturer>(
    capturer: C,
    content_type: &str,
    path: impl AsRef<Path>,
    quality: i32,
    width: i32,
    height: i32,
) -> Result<i32, ArgumentError> {
    let request = EncodeRequest::new(content_type, path.as_ref(), quality, width, height)?;
    let pipeline = PipelineOrchestrator::new(capturer, ImageEncoderRegistry::new());
    Ok(pipeline.take_screenshot(&request).code())
}

/// [`take_screenshot`] from already-validated host arguments.
pub fn take_screenshot_args(args: &ScreenshotArgs) -> Result<i32, ArgumentError> {
    take_screenshot(&args.content_type, &args.path, args.quality, args.width, args.height)
}
