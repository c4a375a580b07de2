use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ConfigError;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "DESKSHOT_CONFIG";

/// Defaults for `deskshot snap` and other callers that do not pass every argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    #[serde(alias = "contentType")]
    pub content_type: String,
    pub quality: i32,
    /// Output width; the display width when unset.
    pub width: Option<u32>,
    /// Output height; the display height when unset.
    pub height: Option<u32>,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            content_type: "image/jpeg".to_owned(),
            quality: 80,
            width: None,
            height: None,
        }
    }
}

impl ScreenshotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load from an explicit path, else `$DESKSHOT_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => {
                debug!("[ScreenshotConfig] loading {:?} from ${}", path, CONFIG_ENV);
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Target size, filling unset dimensions from the display.
    pub fn target_size(&self, display_width: u32, display_height: u32) -> (u32, u32) {
        (
            self.width.unwrap_or(display_width),
            self.height.unwrap_or(display_height),
        )
    }
}
