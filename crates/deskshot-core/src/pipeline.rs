//! `PipelineOrchestrator` — one screenshot: resolve → capture → resize → encode.
//!
//! ```text
//! EncoderRegistry::resolve(content_type)     ─┐ EncoderNotFound (-1), nothing captured
//!   │                                          │
//!   ▼                                          │
//! DisplayCapturer::capture()                  ─┤ -3 / -4 / -5 / -6
//!   │                                          │
//!   ▼                                          │
//! transform(capture, width, height)           ─┤ TargetTooLarge (-2)
//!   │                                          │
//!   ▼                                          │
//! EncoderRegistry::supports_quality()          │
//!   │                                          │
//!   ▼                                          │
//! writer::write(image, descriptor, quality)   ─┘ SaveFailed (-2)
//! ```
//!
//! Every phase is blocking and runs on the caller's thread. Capture handles
//! are released inside the backend before `capture()` returns; the capture
//! itself is dropped when `run` returns.

use tracing::{debug, info, warn};

use crate::capture::DisplayCapturer;
use crate::errors::{DeskshotError, ResultCode};
use crate::registry::EncoderRegistry;
use crate::transform::transform;
use crate::types::EncodeRequest;
use crate::writer::{self, clamp_quality};

pub type PipelineResult = Result<(), DeskshotError>;

pub struct PipelineOrchestrator<C, R> {
    capturer: C,
    registry: R,
}

impl<C: DisplayCapturer, R: EncoderRegistry> PipelineOrchestrator<C, R> {
    pub fn new(capturer: C, registry: R) -> Self {
        Self { capturer, registry }
    }

    pub fn capturer(&self) -> &C {
        &self.capturer
    }

    /// Run all phases, stopping at the first failure.
    pub fn run(&self, request: &EncodeRequest) -> PipelineResult {
        // ── 1. Resolve encoder ────────────────────────────────────────────
        let descriptor = self.registry.resolve(&request.content_type)?;

        // ── 2. Capture ────────────────────────────────────────────────────
        let capture = self.capturer.capture()?;
        debug!(
            "[Pipeline] {} captured {}x{}",
            self.capturer.name(),
            capture.width(),
            capture.height()
        );

        // ── 3. Resize ─────────────────────────────────────────────────────
        let image = transform(&capture, request.target)?;

        // ── 4. Quality capability ─────────────────────────────────────────
        let quality = self
            .registry
            .supports_quality(&descriptor)
            .then(|| clamp_quality(request.quality));

        // ── 5. Persist ────────────────────────────────────────────────────
        writer::write(&image, &descriptor, quality, &request.path)?;
        Ok(())
    }

    /// Run and map the outcome onto the integer result contract.
    pub fn take_screenshot(&self, request: &EncodeRequest) -> ResultCode {
        match self.run(request) {
            Ok(()) => {
                info!(
                    "[Pipeline] {} {} → {}",
                    request.content_type,
                    request.target,
                    request.path.display()
                );
                ResultCode::Success
            }
            Err(e) => {
                warn!("[Pipeline] screenshot failed: {}", e);
                // run() only yields capture and encode errors, both of which carry a code.
                e.result_code().unwrap_or(ResultCode::SaveFailed)
            }
        }
    }
}
