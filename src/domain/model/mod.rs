// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TrimError, TrimResult};

/// Opaque asset identifier, generated once at import and never reused.
///
/// The id doubles as the filename prefix of every on-disk artifact
/// (source, trim output, preview), which is what makes identifier-based
/// recovery scans possible after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Generate a fresh id (UUIDv4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an externally supplied id.
    ///
    /// Ids contain only ASCII alphanumerics and dashes. The underscore is
    /// excluded on purpose: it is the separator between id and filename in
    /// the artifact naming grammar.
    pub fn parse(raw: &str) -> TrimResult<Self> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(TrimError::InvalidInput {
                message: format!("malformed asset id: {:?}", raw),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename prefix shared by every artifact of this asset (`{id}_`)
    pub fn file_prefix(&self) -> String {
        format!("{}_", self.0)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time position in seconds, carried in text as `SS.mmm` with an
/// optional trailing `s` (e.g. `"12.500s"`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp {
    pub seconds: f64,
}

impl Timestamp {
    /// Create a new Timestamp from seconds
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Parse the textual timestamp format.
    ///
    /// Accepts and strips the unit suffix; rejects negative, non-finite
    /// and non-numeric input.
    pub fn parse(raw: &str) -> TrimResult<Self> {
        let trimmed = raw.trim();
        let stripped = trimmed.strip_suffix('s').unwrap_or(trimmed);

        let seconds: f64 = stripped.trim().parse().map_err(|_| TrimError::InvalidTimestamp {
            value: raw.to_string(),
        })?;

        if !seconds.is_finite() || seconds < 0.0 {
            return Err(TrimError::InvalidTimestamp {
                value: raw.to_string(),
            });
        }

        Ok(Self::from_seconds(seconds))
    }

    /// Format as `SS.mmm` with the unit suffix
    pub fn format(&self) -> String {
        let whole = self.seconds as u64;
        let millis = (self.seconds.fract() * 1000.0) as u64;
        format!("{}.{:03}s", whole, millis)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Validated trim range: non-negative start strictly before end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrimRange {
    pub start: f64,
    pub end: f64,
}

impl TrimRange {
    /// Create a new range, rejecting `start >= end` and negative bounds
    pub fn new(start: f64, end: f64) -> TrimResult<Self> {
        if !(start >= 0.0) || !end.is_finite() || start >= end {
            return Err(TrimError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Widen symmetrically by `buffer_seconds`, clamped to
    /// `[0, media_duration]` on both ends.
    ///
    /// For any valid range the widened pair stays strictly ordered, even
    /// when the caller's `end` already sits at (or past) the media
    /// duration.
    pub fn widened(&self, buffer_seconds: f64, media_duration: f64) -> TrimRange {
        if buffer_seconds <= 0.0 {
            return *self;
        }
        let start = (self.start - buffer_seconds).max(0.0);
        let end = (self.end + buffer_seconds).min(media_duration.max(self.end));
        TrimRange { start, end }
    }
}

/// Preview artifact lifecycle: absent until a transcode starts, pending
/// while one runs, ready once the atomic rename has published the file.
/// A failed transcode reverts to absent so a retry is possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewState {
    Absent,
    Pending,
    Ready,
}

impl fmt::Display for PreviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreviewState::Absent => "absent",
            PreviewState::Pending => "pending",
            PreviewState::Ready => "ready",
        };
        write!(f, "{}", label)
    }
}

/// Artifact produced by a successful trim
#[derive(Debug, Clone, Serialize)]
pub struct TrimOutput {
    /// On-disk location, id-prefixed like every other artifact
    pub path: PathBuf,
    /// Name presented to the user (no id prefix)
    pub display_name: String,
}

/// One imported video and its derived artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: AssetId,
    /// Sanitized user-supplied name, kept for deriving output names
    pub original_filename: String,
    /// Uploaded bytes; owned exclusively by this asset
    pub source_path: PathBuf,
    /// 0.0 is the "not yet probed" sentinel; filled on first access
    pub duration_seconds: f64,
    /// One-time codec probe result; true is the fail-open default
    pub browser_playable: bool,
    pub preview_state: PreviewState,
    pub trim_output: Option<TrimOutput>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    /// Create a freshly imported asset with unprobed metadata
    pub fn new(id: AssetId, original_filename: String, source_path: PathBuf) -> Self {
        Self {
            id,
            original_filename,
            source_path,
            duration_seconds: 0.0,
            browser_playable: true,
            preview_state: PreviewState::Absent,
            trim_output: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the duration has been probed yet
    pub fn has_duration(&self) -> bool {
        self.duration_seconds > 0.0
    }
}
