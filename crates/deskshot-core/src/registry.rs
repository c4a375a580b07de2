//! Encoder lookup by content type.
//!
//! The orchestrator only talks to the [`EncoderRegistry`] trait; the default
//! implementation is backed by the `image` crate.

use std::collections::HashMap;
use std::sync::Mutex;

use image::RgbImage;
use tracing::{debug, warn};

use crate::codec::CodecSession;
use crate::errors::EncodeError;
use crate::writer;

/// Resolve encoders and query their capabilities.
pub trait EncoderRegistry {
    /// Exact, case-sensitive match on the encoder's declared content type.
    fn resolve(&self, content_type: &str) -> Result<EncoderDescriptor, EncodeError>;

    /// Whether the encoder accepts a quality parameter.
    fn supports_quality(&self, descriptor: &EncoderDescriptor) -> bool;
}

// MARK: - EncoderKind

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderKind {
    Png,
    Jpeg,
    Bmp,
    Gif,
    Tiff,
}

/// Tunable parameter an encoder may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParameterKind {
    Quality,
}

impl EncoderKind {
    pub const INSTALLED: [Self; 5] = [Self::Png, Self::Jpeg, Self::Bmp, Self::Gif, Self::Tiff];

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tif",
        }
    }

    /// Parameters the encoder declares.
    pub fn declared_parameters(self) -> &'static [ParameterKind] {
        match self {
            Self::Jpeg => &[ParameterKind::Quality],
            Self::Png | Self::Bmp | Self::Gif | Self::Tiff => &[],
        }
    }
}

// MARK: - EncoderDescriptor

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncoderId(pub u32);

/// An installed encoder plus its capability metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderDescriptor {
    id: EncoderId,
    kind: EncoderKind,
    supports_quality: bool,
}

impl EncoderDescriptor {
    pub fn new(id: u32, kind: EncoderKind, supports_quality: bool) -> Self {
        Self { id: EncoderId(id), kind, supports_quality }
    }

    pub fn id(&self) -> EncoderId {
        self.id
    }

    pub fn kind(&self) -> EncoderKind {
        self.kind
    }

    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }

    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    pub fn supports_quality(&self) -> bool {
        self.supports_quality
    }
}

/// Declared parameters that survive a trial encode of a 1×1 image.
///
/// The `image` crate exposes no per-encoder parameter list, so
/// [`EncoderKind::declared_parameters`] is the source of truth here and the
/// trial encode only confirms that each declared parameter is accepted.
pub fn confirmed_parameters(kind: EncoderKind) -> Vec<ParameterKind> {
    let sample = RgbImage::new(1, 1);
    kind.declared_parameters()
        .iter()
        .copied()
        .filter(|param| {
            let quality = match param {
                ParameterKind::Quality => Some(writer::DEFAULT_QUALITY),
            };
            match writer::encode_to_vec(&sample, kind, quality) {
                Ok(_) => true,
                Err(e) => {
                    warn!("[EncoderRegistry] {:?} rejected {:?} in a trial encode: {}", kind, param, e);
                    false
                }
            }
        })
        .collect()
}

fn confirms_quality(kind: EncoderKind) -> bool {
    confirmed_parameters(kind).contains(&ParameterKind::Quality)
}

/// Enumerate and check every encoder compiled into this build.
pub fn enumerate_installed() -> Vec<EncoderDescriptor> {
    EncoderKind::INSTALLED
        .iter()
        .enumerate()
        .map(|(i, &kind)| EncoderDescriptor::new(i as u32, kind, confirms_quality(kind)))
        .collect()
}

// MARK: - ImageEncoderRegistry

/// Registry over the encoders of the `image` crate.
///
/// Holds a [`CodecSession`] for its whole lifetime.
pub struct ImageEncoderRegistry {
    session: CodecSession<'static>,
    quality_cache: Mutex<HashMap<EncoderId, bool>>,
}

impl ImageEncoderRegistry {
    pub fn new() -> Self {
        Self::with_session(CodecSession::acquire_global())
    }

    pub fn with_session(session: CodecSession<'static>) -> Self {
        let quality_cache = session
            .encoders()
            .iter()
            .map(|d| (d.id(), d.supports_quality()))
            .collect();
        Self { session, quality_cache: Mutex::new(quality_cache) }
    }

    /// Installed encoders, in enumeration order.
    pub fn encoders(&self) -> &[EncoderDescriptor] {
        self.session.encoders()
    }
}

impl Default for ImageEncoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderRegistry for ImageEncoderRegistry {
    fn resolve(&self, content_type: &str) -> Result<EncoderDescriptor, EncodeError> {
        let found = self
            .encoders()
            .iter()
            .find(|d| d.content_type() == content_type)
            .cloned();
        match found {
            Some(descriptor) => {
                debug!(
                    "[EncoderRegistry] {} → {:?} (quality={})",
                    content_type,
                    descriptor.kind(),
                    descriptor.supports_quality()
                );
                Ok(descriptor)
            }
            None => {
                warn!("[EncoderRegistry] no encoder for {:?}", content_type);
                Err(EncodeError::EncoderNotFound { content_type: content_type.to_owned() })
            }
        }
    }

    fn supports_quality(&self, descriptor: &EncoderDescriptor) -> bool {
        let mut cache = self
            .quality_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cache
            .entry(descriptor.id())
            .or_insert_with(|| confirms_quality(descriptor.kind()))
    }
}
