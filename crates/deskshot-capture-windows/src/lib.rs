//! deskshot-capture-windows — full-display capture through Win32 GDI.
//!
//! On non-Windows targets a stub backend is compiled that reports the
//! capability as unavailable instead of failing to build.
//!
//! # Windows pipeline
//!
//! ```text
//! GetSystemMetrics(SM_CXSCREEN / SM_CYSCREEN)
//!   │
//!   ▼
//! GetDC(NULL)                      ── ScreenDc guard   (ReleaseDC)
//!   │  CreateCompatibleDC
//!   ▼
//! memory DC                        ── MemoryDc guard   (DeleteDC)
//!   │  CreateCompatibleBitmap(display size)
//!   ▼
//! HBITMAP                          ── Bitmap guard     (DeleteObject)
//!   │  SelectObject                ── Selection guard  (restore previous)
//!   │  BitBlt(SRCCOPY)
//!   ▼
//! GetDIBits (32bpp top-down BGRX) → ScreenCapture (RGB8)
//! ```
//!
//! Guards drop in reverse acquisition order on every exit path.

// ── Platform split ─────────────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
mod gdi;
#[cfg(target_os = "windows")]
pub use gdi::ScreenCapturer;

#[cfg(not(target_os = "windows"))]
mod stub;
#[cfg(not(target_os = "windows"))]
pub use stub::ScreenCapturer;

/// Whether this build has a real capture backend.
pub const CAPTURE_SUPPORTED: bool = cfg!(target_os = "windows");

/// The capture backend for the current platform.
pub fn default_capturer() -> ScreenCapturer {
    ScreenCapturer::open()
}
