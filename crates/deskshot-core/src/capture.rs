use crate::errors::CaptureError;
use crate::types::{Resolution, ScreenCapture};

/// A backend able to snapshot the whole display.
///
/// Backends for hosts without a display return [`CaptureError::Unsupported`]
/// from [`capture`](DisplayCapturer::capture) and `None` from
/// [`display_size`](DisplayCapturer::display_size).
pub trait DisplayCapturer {
    /// Current display size, or `None` when the host lacks the capability.
    fn display_size(&self) -> Option<Resolution>;

    /// Copy the display into memory. Never returns a partial capture.
    fn capture(&self) -> Result<ScreenCapture, CaptureError>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}

impl<T: DisplayCapturer + ?Sized> DisplayCapturer for &T {
    fn display_size(&self) -> Option<Resolution> {
        (**self).display_size()
    }

    fn capture(&self) -> Result<ScreenCapture, CaptureError> {
        (**self).capture()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<T: DisplayCapturer + ?Sized> DisplayCapturer for Box<T> {
    fn display_size(&self) -> Option<Resolution> {
        (**self).display_size()
    }

    fn capture(&self) -> Result<ScreenCapture, CaptureError> {
        (**self).capture()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Display width as the scripting host sees it: `-1` when unavailable.
pub fn width_or_unavailable(capturer: &dyn DisplayCapturer) -> i32 {
    capturer
        .display_size()
        .and_then(|r| i32::try_from(r.width).ok())
        .unwrap_or(-1)
}

/// Display height as the scripting host sees it: `-1` when unavailable.
pub fn height_or_unavailable(capturer: &dyn DisplayCapturer) -> i32 {
    capturer
        .display_size()
        .and_then(|r| i32::try_from(r.height).ok())
        .unwrap_or(-1)
}
