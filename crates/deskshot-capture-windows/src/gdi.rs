//! Win32 GDI full-display capture.
//!
//! Each handle is owned by a guard whose `Drop` releases it, so every early
//! return below unwinds the handles acquired so far in reverse order.

use deskshot_core::{CaptureError, DisplayCapturer, Resolution, ScreenCapture};
use tracing::{debug, warn};
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC,
    HGDIOBJ, SRCCOPY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN};

// ── ScreenCapturer ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenCapturer;

impl ScreenCapturer {
    pub fn open() -> Self {
        debug!("ScreenCapturer::open (GDI)");
        Self
    }
}

impl DisplayCapturer for ScreenCapturer {
    fn display_size(&self) -> Option<Resolution> {
        let (w, h) = unsafe { (GetSystemMetrics(SM_CXSCREEN), GetSystemMetrics(SM_CYSCREEN)) };
        Some(Resolution::new(w.max(0) as u32, h.max(0) as u32))
    }

    fn capture(&self) -> Result<ScreenCapture, CaptureError> {
        let display = self.display_size().unwrap_or(Resolution::new(0, 0));
        let (w, h) = (display.width as i32, display.height as i32);

        let screen = ScreenDc::acquire().ok_or(CaptureError::NoDisplayContext)?;
        let mem = MemoryDc::compatible_with(&screen).ok_or(CaptureError::NoDisplayContext)?;
        let bitmap = Bitmap::compatible_with(&screen, w, h).ok_or(
            CaptureError::NoCompatibleSurface { width: display.width, height: display.height },
        )?;

        {
            let _selected = Selection::select(&mem, &bitmap).ok_or(
                CaptureError::NoCompatibleSurface { width: display.width, height: display.height },
            )?;
            unsafe { BitBlt(mem.0, 0, 0, w, h, screen.0, 0, 0, SRCCOPY) }.map_err(|e| {
                CaptureError::BlockCopyFailed { reason: format!("BitBlt: {e}") }
            })?;
        }

        // The bitmap must be deselected before GetDIBits reads it.
        let bgrx = bitmap.read_bgrx(&screen, display)?;
        let capture = ScreenCapture::from_bgrx(&bgrx, display).ok_or_else(|| {
            CaptureError::BlockCopyFailed { reason: "pixel buffer size mismatch".into() }
        })?;
        debug!("[GdiCapturer] captured {}", display);
        Ok(capture)
    }

    fn name(&self) -> &'static str {
        "gdi"
    }
}

// ── Handle guards ─────────────────────────────────────────────────────────────

/// Display device context from `GetDC(NULL)`.
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Option<Self> {
        let hdc = unsafe { GetDC(HWND::default()) };
        (!hdc.is_invalid()).then_some(Self(hdc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        if unsafe { ReleaseDC(HWND::default(), self.0) } == 0 {
            warn!("[GdiCapturer] ReleaseDC failed");
        }
    }
}

/// Off-screen device context compatible with the display.
struct MemoryDc(HDC);

impl MemoryDc {
    fn compatible_with(screen: &ScreenDc) -> Option<Self> {
        let hdc = unsafe { CreateCompatibleDC(screen.0) };
        (!hdc.is_invalid()).then_some(Self(hdc))
    }
}

impl Drop for MemoryDc {
    fn drop(&mut self) {
        if !unsafe { DeleteDC(self.0) }.as_bool() {
            warn!("[GdiCapturer] DeleteDC failed");
        }
    }
}

/// Display-compatible bitmap sized to the whole screen.
struct Bitmap(HBITMAP);

impl Bitmap {
    fn compatible_with(screen: &ScreenDc, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let hbm = unsafe { CreateCompatibleBitmap(screen.0, width, height) };
        (!hbm.is_invalid()).then_some(Self(hbm))
    }

    /// Copy the bitmap's pixels out as 32bpp top-down BGRX.
    fn read_bgrx(&self, screen: &ScreenDc, display: Resolution) -> Result<Vec<u8>, CaptureError> {
        let mut info = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: display.width as i32,
                // Negative height selects a top-down DIB.
                biHeight: -(display.height as i32),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut buf = vec![0u8; display.total_pixels() as usize * 4];
        let lines = unsafe {
            GetDIBits(
                screen.0,
                self.0,
                0,
                display.height,
                Some(buf.as_mut_ptr().cast()),
                &mut info,
                DIB_RGB_COLORS,
            )
        };
        if lines != display.height as i32 {
            return Err(CaptureError::BlockCopyFailed {
                reason: format!("GetDIBits copied {lines} of {} lines", display.height),
            });
        }
        Ok(buf)
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        if !unsafe { DeleteObject(self.0) }.as_bool() {
            warn!("[GdiCapturer] DeleteObject(bitmap) failed");
        }
    }
}

/// Bitmap selected into a memory DC; restores the previous object on drop.
struct Selection<'a> {
    dc: &'a MemoryDc,
    previous: HGDIOBJ,
}

impl<'a> Selection<'a> {
    fn select(dc: &'a MemoryDc, bitmap: &Bitmap) -> Option<Self> {
        let previous = unsafe { SelectObject(dc.0, bitmap.0) };
        (!previous.is_invalid()).then_some(Self { dc, previous })
    }
}

impl Drop for Selection<'_> {
    fn drop(&mut self) {
        unsafe { SelectObject(self.dc.0, self.previous) };
    }
}
