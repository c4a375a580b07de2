//! Non-Windows stub for ScreenCapturer (CI + cross-compilation).

use deskshot_core::{CaptureError, DisplayCapturer, Resolution, ScreenCapture};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    pub fn open() -> Self {
        debug!("[ScreenCapturer] open stub (non-Windows), capture unavailable");
        Self
    }
}

impl DisplayCapturer for ScreenCapturer {
    fn display_size(&self) -> Option<Resolution> {
        None
    }

    fn capture(&self) -> Result<ScreenCapture, CaptureError> {
        warn!("[ScreenCapturer] display capture is not available on this platform");
        Err(CaptureError::Unsupported)
    }

    fn name(&self) -> &'static str {
        "unsupported"
    }
}
