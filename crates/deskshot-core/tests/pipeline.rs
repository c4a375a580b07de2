//! End-to-end pipeline tests against a synthetic display.
//!
//! `SyntheticDisplay` hands out scoped handle guards in the same order the
//! GDI backend does, so leaks and early-exit cleanup are observable here.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use deskshot_core::capture::{height_or_unavailable, width_or_unavailable};
use deskshot_core::{
    CaptureError, DisplayCapturer, EncodeRequest, ImageEncoderRegistry, PipelineOrchestrator,
    Resolution, ResultCode, ScreenCapture,
};
use image::{GenericImageView, Rgb, RgbImage};

#[derive(Debug, Clone, Copy, PartialEq)]
enum FailAt {
    Nowhere,
    DisplayContext,
    Surface,
    BlockCopy,
}

#[derive(Default)]
struct Ledger {
    open: Cell<usize>,
    peak: Cell<usize>,
    captures: Cell<usize>,
}

struct Handle {
    ledger: Rc<Ledger>,
}

impl Handle {
    fn acquire(ledger: &Rc<Ledger>) -> Self {
        ledger.open.set(ledger.open.get() + 1);
        ledger.peak.set(ledger.peak.get().max(ledger.open.get()));
        Self { ledger: Rc::clone(ledger) }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.ledger.open.set(self.ledger.open.get() - 1);
    }
}

struct SyntheticDisplay {
    size: Option<Resolution>,
    fail_at: FailAt,
    noisy: bool,
    ledger: Rc<Ledger>,
}

/// Deterministic per-pixel noise; compresses badly so JPEG quality shows in the file size.
fn noise(x: u32, y: u32) -> Rgb<u8> {
    let mut h = x.wrapping_mul(0x9E37_79B1) ^ y.wrapping_mul(0x85EB_CA77);
    h ^= h >> 15;
    h = h.wrapping_mul(0x2C1B_3C6D);
    h ^= h >> 12;
    let [r, g, b, _] = h.to_le_bytes();
    Rgb([r, g, b])
}

impl SyntheticDisplay {
    fn new(width: u32, height: u32) -> Self {
        Self {
            size: Some(Resolution::new(width, height)),
            fail_at: FailAt::Nowhere,
            noisy: false,
            ledger: Rc::default(),
        }
    }

    fn noisy(width: u32, height: u32) -> Self {
        Self { noisy: true, ..Self::new(width, height) }
    }

    fn headless() -> Self {
        Self { size: None, ..Self::new(0, 0) }
    }

    fn failing(fail_at: FailAt) -> Self {
        Self { fail_at, ..Self::new(320, 200) }
    }
}

impl DisplayCapturer for SyntheticDisplay {
    fn display_size(&self) -> Option<Resolution> {
        self.size
    }

    fn capture(&self) -> Result<ScreenCapture, CaptureError> {
        self.ledger.captures.set(self.ledger.captures.get() + 1);
        let display = self.size.ok_or(CaptureError::Unsupported)?;

        let _screen = Handle::acquire(&self.ledger);
        if self.fail_at == FailAt::DisplayContext {
            return Err(CaptureError::NoDisplayContext);
        }
        let _mem = Handle::acquire(&self.ledger);
        if self.fail_at == FailAt::Surface {
            return Err(CaptureError::NoCompatibleSurface {
                width: display.width,
                height: display.height,
            });
        }
        let _bitmap = Handle::acquire(&self.ledger);
        if self.fail_at == FailAt::BlockCopy {
            return Err(CaptureError::BlockCopyFailed { reason: "synthetic".into() });
        }

        let img = RgbImage::from_fn(display.width, display.height, |x, y| {
            if self.noisy {
                noise(x, y)
            } else {
                Rgb([(x % 256) as u8, (y % 256) as u8, 64])
            }
        });
        Ok(ScreenCapture::new(img, display))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

fn request(content_type: &str, path: &Path, quality: i32, w: i32, h: i32) -> EncodeRequest {
    EncodeRequest::new(content_type, path, quality, w, h).expect("valid request")
}

#[test]
fn jpeg_is_resized_to_requested_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.jpg");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(1920, 1080), ImageEncoderRegistry::new());

    let code = pipeline.take_screenshot(&request("image/jpeg", &out, 80, 800, 600));

    assert_eq!(code, ResultCode::Success);
    assert_eq!(code.code(), 0);
    let decoded = image::open(&out).expect("decodable jpeg");
    assert_eq!(decoded.dimensions(), (800, 600));
}

#[test]
fn native_size_png_is_pixel_exact() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("native.png");
    let display = SyntheticDisplay::new(64, 40);
    let expected = display.capture().unwrap().into_image();
    let pipeline = PipelineOrchestrator::new(display, ImageEncoderRegistry::new());

    assert_eq!(pipeline.take_screenshot(&request("image/png", &out, 0, 64, 40)), ResultCode::Success);

    let decoded = image::open(&out).unwrap().to_rgb8();
    assert_eq!(decoded, expected);
}

#[test]
fn unknown_content_type_captures_nothing_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.webp");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(1920, 1080), ImageEncoderRegistry::new());

    let code = pipeline.take_screenshot(&request("image/webp", &out, 80, 800, 600));

    assert_eq!(code.code(), -1);
    assert!(!out.exists());
    assert_eq!(pipeline.capturer().ledger.captures.get(), 0);
}

#[test]
fn capture_failures_map_to_codes_and_release_handles() {
    let cases = [
        (FailAt::DisplayContext, -3),
        (FailAt::Surface, -4),
        (FailAt::BlockCopy, -5),
    ];
    for (fail_at, expected) in cases {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let pipeline =
            PipelineOrchestrator::new(SyntheticDisplay::failing(fail_at), ImageEncoderRegistry::new());

        let code = pipeline.take_screenshot(&request("image/png", &out, 80, 100, 100));

        assert_eq!(code.code(), expected, "{fail_at:?}");
        assert_eq!(pipeline.capturer().ledger.open.get(), 0, "{fail_at:?} leaked");
        assert!(!out.exists());
    }
}

#[test]
fn headless_host_reports_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.png");
    let display = SyntheticDisplay::headless();
    assert_eq!(width_or_unavailable(&display), -1);
    assert_eq!(height_or_unavailable(&display), -1);

    let pipeline = PipelineOrchestrator::new(display, ImageEncoderRegistry::new());
    let code = pipeline.take_screenshot(&request("image/png", &out, 80, 10, 10));
    assert_eq!(code, ResultCode::PlatformUnsupported);
    assert!(!out.exists());
}

#[test]
fn capture_matches_reported_display_size() {
    let display = SyntheticDisplay::new(1280, 720);
    let capture = display.capture().unwrap();
    assert_eq!(capture.width() as i32, width_or_unavailable(&display));
    assert_eq!(capture.height() as i32, height_or_unavailable(&display));
    assert_eq!(capture.display(), Resolution::new(1280, 720));
}

#[test]
fn unwritable_destination_is_save_failed() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no-such-dir").join("out.bmp");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(32, 32), ImageEncoderRegistry::new());

    let code = pipeline.take_screenshot(&request("image/bmp", &out, 80, 16, 16));

    assert_eq!(code.code(), -2);
    assert!(!out.exists());
}

#[test]
fn repeated_invocations_do_not_leak_handles() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("loop.gif");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(48, 32), ImageEncoderRegistry::new());

    for _ in 0..100 {
        assert_eq!(
            pipeline.take_screenshot(&request("image/gif", &out, 50, 24, 16)),
            ResultCode::Success
        );
    }

    let ledger = &pipeline.capturer().ledger;
    assert_eq!(ledger.captures.get(), 100);
    assert_eq!(ledger.open.get(), 0);
    assert_eq!(ledger.peak.get(), 3);
}

#[test]
fn out_of_range_quality_is_clamped_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(64, 64), ImageEncoderRegistry::new());

    for (i, quality) in [-20, 0, 101, 5000].into_iter().enumerate() {
        let out = dir.path().join(format!("q{i}.jpg"));
        assert_eq!(
            pipeline.take_screenshot(&request("image/jpeg", &out, quality, 32, 32)),
            ResultCode::Success,
            "quality {quality}"
        );
        assert!(out.exists());
    }
}

#[test]
fn quality_reaches_jpeg_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let low = dir.path().join("low.jpg");
    let high = dir.path().join("high.jpg");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::noisy(128, 96), ImageEncoderRegistry::new());

    assert_eq!(pipeline.take_screenshot(&request("image/jpeg", &low, 5, 128, 96)), ResultCode::Success);
    assert_eq!(pipeline.take_screenshot(&request("image/jpeg", &high, 95, 128, 96)), ResultCode::Success);

    let low_len = std::fs::metadata(&low).unwrap().len();
    let high_len = std::fs::metadata(&high).unwrap().len();
    assert!(low_len < high_len, "q5 {low_len} bytes vs q95 {high_len} bytes");
}

#[test]
fn quality_is_ignored_by_png_encoder() {
    let dir = tempfile::tempdir().unwrap();
    let low = dir.path().join("low.png");
    let high = dir.path().join("high.png");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::noisy(128, 96), ImageEncoderRegistry::new());

    assert_eq!(pipeline.take_screenshot(&request("image/png", &low, 5, 128, 96)), ResultCode::Success);
    assert_eq!(pipeline.take_screenshot(&request("image/png", &high, 95, 128, 96)), ResultCode::Success);

    assert_eq!(std::fs::read(&low).unwrap(), std::fs::read(&high).unwrap());
}

#[test]
fn oversized_target_is_save_failed_not_an_abort() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("huge.png");
    let pipeline =
        PipelineOrchestrator::new(SyntheticDisplay::new(32, 32), ImageEncoderRegistry::new());

    let code = pipeline.take_screenshot(&request("image/png", &out, 80, i32::MAX, i32::MAX));

    assert_eq!(code, ResultCode::SaveFailed);
    assert!(!out.exists());
    assert_eq!(pipeline.capturer().ledger.open.get(), 0);
}
