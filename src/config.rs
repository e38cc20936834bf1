//! Configuration: defaults, optional TOML file, environment overrides
//!
//! Precedence: environment variable for the data directory, then the
//! config file, then built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{TrimError, TrimResult};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "VIDTRIM_DATA_DIR";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub trim: TrimConfig,
    pub preview: PreviewConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root of the uploads/output/previews tree
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    /// Symmetric widening applied to every trim range, in seconds.
    /// 0 disables widening; clamped to the media duration either way.
    pub buffer_seconds: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            buffer_seconds: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Previews are downscaled to at most this height
    pub max_height: u32,
    /// Bitrate cap for the preview video stream
    pub video_bitrate_kbps: u32,
    /// Encoder speed preset
    pub preset: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_height: 720,
            video_bitrate_kbps: 2000,
            preset: "ultrafast".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ffmpeg_bin: PathBuf,
    pub ffprobe_bin: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            ffprobe_bin: PathBuf::from("ffprobe"),
        }
    }
}

impl AppConfig {
    /// Load configuration, merging an optional TOML file over defaults
    pub fn load(path: Option<&Path>) -> TrimResult<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| TrimError::classify_io(e, path))?;
                toml::from_str(&content).map_err(|e| TrimError::InvalidInput {
                    message: format!("failed to parse config file {}: {}", path.display(), e),
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> TrimResult<()> {
        if !self.trim.buffer_seconds.is_finite() || self.trim.buffer_seconds < 0.0 {
            return Err(TrimError::InvalidInput {
                message: format!(
                    "trim.buffer_seconds must be a non-negative number, got {}",
                    self.trim.buffer_seconds
                ),
            });
        }
        if self.preview.max_height == 0 {
            return Err(TrimError::InvalidInput {
                message: "preview.max_height must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Effective data directory: env override, then config file, then a
    /// `VidTrim` directory under the user's home
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        dirs::home_dir()
            .map(|home| home.join("VidTrim"))
            .unwrap_or_else(|| PathBuf::from("vidtrim-data"))
    }
}
