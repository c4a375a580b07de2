use std::path::PathBuf;

use image::RgbImage;

use crate::errors::ArgumentError;

// MARK: - Resolution

/// Display or image resolution in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

// MARK: - PixelFormat

/// Pixel layout of an in-memory image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 4 bytes per pixel as handed out by GDI: Blue, Green, Red, unused.
    Bgrx,
    /// 3 bytes per pixel: Red, Green, Blue.
    Rgb8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Bgrx => 4,
            Self::Rgb8 => 3,
        }
    }
}

// MARK: - ScreenCapture

/// A full-display snapshot owned by a single pipeline invocation.
#[derive(Debug, Clone)]
pub struct ScreenCapture {
    image: RgbImage,
    display: Resolution,
}

impl ScreenCapture {
    /// Wrap an RGB image captured while the display reported `display`.
    pub fn new(image: RgbImage, display: Resolution) -> Self {
        Self { image, display }
    }

    /// Build a capture from a tightly packed, top-down BGRX buffer.
    ///
    /// Returns `None` when the buffer length does not match `display`.
    pub fn from_bgrx(bgrx: &[u8], display: Resolution) -> Option<Self> {
        let expected = display.total_pixels() as usize * PixelFormat::Bgrx.bytes_per_pixel();
        if bgrx.len() != expected {
            return None;
        }
        let mut rgb = Vec::with_capacity(display.total_pixels() as usize * 3);
        for px in bgrx.chunks_exact(4) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        let image = RgbImage::from_raw(display.width, display.height, rgb)?;
        Some(Self { image, display })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgb8
    }

    /// Display metrics reported by the host when the capture was taken.
    pub fn display(&self) -> Resolution {
        self.display
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

// MARK: - EncodeRequest

/// Everything one `take_screenshot` invocation needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub content_type: String,
    pub path: PathBuf,
    pub quality: i32,
    pub target: Resolution,
}

impl EncodeRequest {
    /// Validate caller input. Width and height must be positive.
    pub fn new(
        content_type: impl Into<String>,
        path: impl Into<PathBuf>,
        quality: i32,
        width: i32,
        height: i32,
    ) -> Result<Self, ArgumentError> {
        if width <= 0 || height <= 0 {
            return Err(ArgumentError::NonPositiveDimensions { width, height });
        }
        Ok(Self {
            content_type: content_type.into(),
            path: path.into(),
            quality,
            target: Resolution::new(width as u32, height as u32),
        })
    }
}
