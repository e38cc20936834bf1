// Ports - Interface definitions (contracts)

use std::path::Path;

use async_trait::async_trait;

use crate::error::TrimResult;

/// Options for a range encode, shaped around what a browser-compatible
/// MP4 needs.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Target video codec (encoder name, e.g. "libx264")
    pub video_codec: String,
    /// Target audio codec (e.g. "aac")
    pub audio_codec: String,
    /// Quality/speed preset (e.g. "ultrafast", "medium")
    pub preset: String,
    /// Optional video bitrate cap in kbit/s
    pub video_bitrate_kbps: Option<u32>,
    /// Downscale to at most this height, preserving aspect ratio
    pub max_height: Option<u32>,
    /// Pixel format override for decoder compatibility (e.g. "yuv420p")
    pub pixel_format: Option<String>,
    /// Place the MP4 index at the front of the file for streaming starts
    pub faststart: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "ultrafast".to_string(),
            video_bitrate_kbps: None,
            max_height: None,
            pixel_format: None,
            faststart: true,
        }
    }
}

impl EncodeOptions {
    /// Options for a browser-preview transcode: capped height and
    /// bitrate, broadly decodable pixel format.
    pub fn preview(max_height: u32, video_bitrate_kbps: u32, preset: &str) -> Self {
        Self {
            preset: preset.to_string(),
            video_bitrate_kbps: Some(video_bitrate_kbps),
            max_height: Some(max_height),
            pixel_format: Some("yuv420p".to_string()),
            ..Self::default()
        }
    }
}

/// Port for the external media engine: probing and range encoding.
///
/// The core depends on this capability but does not implement any video
/// processing itself.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Duration of the media at `path` in seconds
    async fn probe_duration(&self, path: &Path) -> TrimResult<f64>;

    /// Codec tag of the primary video stream, or `None` when the probe
    /// is inconclusive
    async fn probe_video_codec(&self, path: &Path) -> TrimResult<Option<String>>;

    /// Encode `[start, end)` seconds of `source` into `output`
    async fn encode_range(
        &self,
        source: &Path,
        start: f64,
        end: f64,
        output: &Path,
        options: &EncodeOptions,
    ) -> TrimResult<()>;
}
