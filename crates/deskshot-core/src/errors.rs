use thiserror::Error;

use crate::types::Resolution;

#[derive(Error, Debug)]
pub enum DeskshotError {
    #[error("Argument error: {0}")]
    Argument(#[from] ArgumentError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),
}

impl DeskshotError {
    /// Integer code reported to callers. Argument errors have none.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            Self::Argument(_) => None,
            Self::Capture(e) => Some(e.result_code()),
            Self::Encode(e) => Some(e.result_code()),
        }
    }
}

/// Malformed caller input. Raised before the pipeline starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("Wrong number of arguments")]
    WrongArity { expected: usize, got: usize },

    #[error("Wrong type of arguments")]
    WrongType { index: usize, value: String },

    #[error("Width and height must be positive (got {width}x{height})")]
    NonPositiveDimensions { width: i32, height: i32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Could not acquire a compatible drawing context")]
    NoDisplayContext,

    #[error("Could not create a compatible off-screen surface ({width}x{height})")]
    NoCompatibleSurface { width: u32, height: u32 },

    #[error("Block copy from the display failed: {reason}")]
    BlockCopyFailed { reason: String },

    #[error("Display capture is not supported on this platform")]
    Unsupported,
}

impl CaptureError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::NoDisplayContext => ResultCode::NoDisplayContext,
            Self::NoCompatibleSurface { .. } => ResultCode::NoCompatibleSurface,
            Self::BlockCopyFailed { .. } => ResultCode::BlockCopyFailed,
            Self::Unsupported => ResultCode::PlatformUnsupported,
        }
    }
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("No encoder installed for content type {content_type:?}")]
    EncoderNotFound { content_type: String },

    #[error("Failed to save {path}: {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("Target size {target} exceeds the resample memory limit")]
    TargetTooLarge { target: Resolution },
}

impl EncodeError {
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::EncoderNotFound { .. } => ResultCode::EncoderNotFound,
            Self::SaveFailed { .. } | Self::TargetTooLarge { .. } => ResultCode::SaveFailed,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// MARK: - ResultCode

/// Integer result contract of `take_screenshot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    Success = 0,
    EncoderNotFound = -1,
    SaveFailed = -2,
    NoDisplayContext = -3,
    NoCompatibleSurface = -4,
    BlockCopyFailed = -5,
    PlatformUnsupported = -6,
}

const UNKNOWN_RESULT: &str = "Result did not match a known result code";

impl ResultCode {
    pub const ALL: [Self; 7] = [
        Self::Success,
        Self::EncoderNotFound,
        Self::SaveFailed,
        Self::NoDisplayContext,
        Self::NoCompatibleSurface,
        Self::BlockCopyFailed,
        Self::PlatformUnsupported,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Success => "Screenshot saved",
            Self::EncoderNotFound => "No encoder found for the requested content type",
            Self::SaveFailed => "Encoding or saving the image failed",
            Self::NoDisplayContext => "Could not create a compatible drawing context",
            Self::NoCompatibleSurface => "Could not create a compatible off-screen bitmap",
            Self::BlockCopyFailed => "Block copy of the display contents failed",
            Self::PlatformUnsupported => "Display capture is not supported on this platform",
        }
    }

    /// Description for any integer, including codes outside the contract.
    pub fn describe_code(code: i32) -> &'static str {
        Self::from_code(code).map_or(UNKNOWN_RESULT, Self::describe)
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code(), self.describe())
    }
}
