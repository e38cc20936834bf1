//! FFmpeg adapter for media probing and encoding
//!
//! Probes via `ffprobe` (JSON output) and encodes via the `ffmpeg`
//! binary. Both are spawned as child processes; nothing here links
//! against libav.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{TrimError, TrimResult};
use crate::ports::{EncodeOptions, MediaEngine};

/// Media engine backed by the ffmpeg/ffprobe binaries
pub struct FfmpegEngine {
    ffmpeg_bin: PathBuf,
    ffprobe_bin: PathBuf,
}

impl FfmpegEngine {
    /// Create an engine using explicit binary locations
    pub fn new(ffmpeg_bin: impl Into<PathBuf>, ffprobe_bin: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
            ffprobe_bin: ffprobe_bin.into(),
        }
    }

    /// Create an engine resolving both binaries from PATH
    pub fn from_path() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }

    /// Check whether the probe binary responds
    pub async fn is_available(&self) -> bool {
        Command::new(&self.ffprobe_bin)
            .arg("-version")
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn run_ffprobe(&self, path: &Path) -> TrimResult<FfprobeOutput> {
        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| TrimError::EngineFailure {
                message: format!("failed to run ffprobe: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TrimError::EngineFailure {
                message: format!("ffprobe failed for {}: {}", path.display(), stderr.trim()),
            });
        }

        parse_ffprobe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn probe_duration(&self, path: &Path) -> TrimResult<f64> {
        let probed = self.run_ffprobe(path).await?;
        probed
            .duration_seconds()
            .ok_or_else(|| TrimError::EngineFailure {
                message: format!("could not determine duration of {}", path.display()),
            })
    }

    async fn probe_video_codec(&self, path: &Path) -> TrimResult<Option<String>> {
        let probed = self.run_ffprobe(path).await?;
        Ok(probed.primary_video_codec())
    }

    async fn encode_range(
        &self,
        source: &Path,
        start: f64,
        end: f64,
        output: &Path,
        options: &EncodeOptions,
    ) -> TrimResult<()> {
        let args = build_encode_args(source, start, end, output, options);
        debug!(ffmpeg = %self.ffmpeg_bin.display(), ?args, "running encode");

        let result = Command::new(&self.ffmpeg_bin)
            .args(&args)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => TrimError::EngineFailure {
                    message: format!(
                        "ffmpeg binary not found at {}; is ffmpeg installed?",
                        self.ffmpeg_bin.display()
                    ),
                },
                _ => TrimError::classify_io(e, output),
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(source = %source.display(), "ffmpeg exited non-zero");
            return Err(classify_engine_stderr(&stderr));
        }

        Ok(())
    }
}

// =============================================================================
// FFprobe JSON response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<FfprobeStream>>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    codec_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

impl FfprobeOutput {
    /// Container duration in seconds, when ffprobe reported one
    fn duration_seconds(&self) -> Option<f64> {
        self.format
            .as_ref()
            .and_then(|f| f.duration.as_ref())
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| *d > 0.0)
    }

    /// Codec of the first video stream
    fn primary_video_codec(&self) -> Option<String> {
        self.streams
            .as_ref()?
            .iter()
            .find(|s| s.codec_type == "video")
            .and_then(|s| s.codec_name.clone())
    }
}

fn parse_ffprobe_output(json: &str) -> TrimResult<FfprobeOutput> {
    serde_json::from_str(json).map_err(|e| TrimError::EngineFailure {
        message: format!("failed to parse ffprobe output: {}", e),
    })
}

// =============================================================================
// Encode command construction
// =============================================================================

/// Build the ffmpeg argument list for a range encode.
///
/// `-ss` before `-i` seeks fast; the clip length is then expressed with
/// `-t` because output timestamps restart at zero after an input seek.
fn build_encode_args(
    source: &Path,
    start: f64,
    end: f64,
    output: &Path,
    options: &EncodeOptions,
) -> Vec<String> {
    let mut args = vec![
        "-nostdin".to_string(),
        "-hide_banner".to_string(),
        "-y".to_string(),
        "-ss".to_string(),
        format!("{:.3}", start),
        "-i".to_string(),
        source.display().to_string(),
        "-t".to_string(),
        format!("{:.3}", end - start),
        "-c:v".to_string(),
        options.video_codec.clone(),
        "-preset".to_string(),
        options.preset.clone(),
        "-c:a".to_string(),
        options.audio_codec.clone(),
    ];

    if let Some(height) = options.max_height {
        // Downscale only; the escaped comma keeps min() inside one filter
        args.push("-vf".to_string());
        args.push(format!("scale=-2:min({}\\,ih)", height));
    }

    if let Some(kbps) = options.video_bitrate_kbps {
        args.push("-b:v".to_string());
        args.push(format!("{}k", kbps));
    }

    if let Some(pix_fmt) = &options.pixel_format {
        args.push("-pix_fmt".to_string());
        args.push(pix_fmt.clone());
    }

    if options.faststart {
        args.push("-movflags".to_string());
        args.push("+faststart".to_string());
    }

    args.push(output.display().to_string());
    args
}

/// Map ffmpeg's stderr onto the error taxonomy. Disk exhaustion and
/// permission failures are surfaced with their actionable messages;
/// everything else is an engine failure carrying the last stderr line.
fn classify_engine_stderr(stderr: &str) -> TrimError {
    if stderr.contains("No space left") {
        return TrimError::ResourceExhausted {
            message: "No space left on device. Please free up disk space.".to_string(),
        };
    }
    if stderr.contains("Permission denied") {
        return TrimError::ResourceExhausted {
            message: "Permission denied while writing output. Check the output folder permissions."
                .to_string(),
        };
    }

    let detail = stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "ffmpeg exited with an error".to_string());
    TrimError::EngineFailure { message: detail }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_metadata() {
        let json = r#"{
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "hevc",
                    "width": 1920,
                    "height": 1080
                },
                {
                    "codec_type": "audio",
                    "codec_name": "aac"
                }
            ],
            "format": {
                "duration": "10.000000",
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2"
            }
        }"#;

        let probed = parse_ffprobe_output(json).unwrap();
        assert_eq!(probed.duration_seconds(), Some(10.0));
        assert_eq!(probed.primary_video_codec().as_deref(), Some("hevc"));
    }

    #[test]
    fn test_parse_audio_only_has_no_video_codec() {
        let json = r#"{
            "streams": [
                {"codec_type": "audio", "codec_name": "mp3"}
            ],
            "format": {"duration": "180.0"}
        }"#;

        let probed = parse_ffprobe_output(json).unwrap();
        assert_eq!(probed.duration_seconds(), Some(180.0));
        assert!(probed.primary_video_codec().is_none());
    }

    #[test]
    fn test_parse_missing_duration() {
        let json = r#"{"streams": [], "format": {}}"#;
        let probed = parse_ffprobe_output(json).unwrap();
        assert!(probed.duration_seconds().is_none());
    }

    #[test]
    fn test_parse_zero_duration_is_unknown() {
        let json = r#"{"format": {"duration": "0.0"}}"#;
        let probed = parse_ffprobe_output(json).unwrap();
        assert!(probed.duration_seconds().is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_ffprobe_output("not json").is_err());
    }

    #[test]
    fn test_build_encode_args_range() {
        let options = EncodeOptions::default();
        let args = build_encode_args(
            Path::new("in.mov"),
            2.0,
            7.0,
            Path::new("out.mp4"),
            &options,
        );

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss + 1], "2.000");
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert_eq!(args[t + 1], "5.000");
        // Fast seek: -ss must precede -i
        assert!(ss < args.iter().position(|a| a == "-i").unwrap());
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_build_encode_args_preview_profile() {
        let options = EncodeOptions::preview(720, 2000, "ultrafast");
        let args = build_encode_args(
            Path::new("in.mov"),
            0.0,
            10.0,
            Path::new("preview.mp4"),
            &options,
        );

        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf + 1], "scale=-2:min(720\\,ih)");
        let bv = args.iter().position(|a| a == "-b:v").unwrap();
        assert_eq!(args[bv + 1], "2000k");
        assert!(args.contains(&"yuv420p".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
    }

    #[test]
    fn test_build_encode_args_no_cap_no_filter() {
        let options = EncodeOptions::default();
        let args = build_encode_args(Path::new("a"), 0.0, 1.0, Path::new("b"), &options);
        assert!(!args.contains(&"-vf".to_string()));
        assert!(!args.contains(&"-b:v".to_string()));
    }

    #[test]
    fn test_classify_stderr_disk_full() {
        let err = classify_engine_stderr("av_interleaved_write_frame(): No space left on device");
        assert!(matches!(err, TrimError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_classify_stderr_permission() {
        let err = classify_engine_stderr("out.mp4: Permission denied");
        assert!(matches!(err, TrimError::ResourceExhausted { .. }));
    }

    #[test]
    fn test_classify_stderr_generic_keeps_last_line() {
        let err = classify_engine_stderr("first line\nError while decoding stream\n");
        match err {
            TrimError::EngineFailure { message } => {
                assert_eq!(message, "Error while decoding stream")
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
