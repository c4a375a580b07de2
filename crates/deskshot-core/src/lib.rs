//! deskshot-core — everything between "grab the display" and "file on disk".
//!
//! Platform capture backends live in `deskshot-capture-windows`; this crate
//! only sees them through [`DisplayCapturer`].

pub mod capture;
pub mod codec;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod registry;
pub mod transform;
pub mod types;
pub mod writer;

pub use capture::DisplayCapturer;
pub use codec::{CodecLifecycle, CodecSession};
pub use config::ScreenshotConfig;
pub use errors::{ArgumentError, CaptureError, DeskshotError, EncodeError, ResultCode};
pub use pipeline::{PipelineOrchestrator, PipelineResult};
pub use registry::{EncoderDescriptor, EncoderKind, EncoderRegistry, ImageEncoderRegistry};
pub use types::*;
