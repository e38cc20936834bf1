//! Trim job: range validation, clamping and engine invocation

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::model::{AssetId, Timestamp, TrimOutput, TrimRange};
use crate::domain::rules;
use crate::error::{TrimError, TrimResult};
use crate::ports::{EncodeOptions, MediaEngine};
use crate::registry::AssetRegistry;

/// A trim request as it arrives from the outer surface, times still textual
#[derive(Debug, Clone)]
pub struct TrimRequest {
    pub id: AssetId,
    /// Start time text, e.g. `"2.000s"`
    pub start: String,
    /// End time text; `None` means the asset's full duration
    pub end: Option<String>,
    /// Optional custom output base name
    pub output_name: Option<String>,
}

/// Result of a successful trim
#[derive(Debug, Clone, Serialize)]
pub struct TrimOutcome {
    pub output_name: String,
    pub output_path: PathBuf,
    /// The range actually encoded, after buffering and clamping
    pub range: TrimRange,
}

/// Produces a new video file spanning a sub-range of an asset's timeline.
pub struct TrimJob {
    registry: Arc<AssetRegistry>,
    engine: Arc<dyn MediaEngine>,
    /// Symmetric widening applied to every requested range; 0 disables
    buffer_seconds: f64,
    options: EncodeOptions,
}

impl TrimJob {
    pub fn new(
        registry: Arc<AssetRegistry>,
        engine: Arc<dyn MediaEngine>,
        buffer_seconds: f64,
    ) -> Self {
        Self {
            registry,
            engine,
            buffer_seconds,
            options: EncodeOptions::default(),
        }
    }

    /// Validate the request, encode the range into a temporary file and
    /// publish it with a single rename. A failed encode leaves nothing
    /// at the final path.
    pub async fn run(&self, request: TrimRequest) -> TrimResult<TrimOutcome> {
        let asset = self.registry.lookup(&request.id)?;

        // The source may have been deleted between import and now
        if !asset.source_path.exists() {
            return Err(TrimError::SourceMissing {
                path: asset.source_path.display().to_string(),
            });
        }

        let start = Timestamp::parse(&request.start)?;
        let duration =
            super::ensure_duration(&self.registry, self.engine.as_ref(), &asset).await?;
        let end = match &request.end {
            Some(raw) => Timestamp::parse(raw)?.seconds.min(duration),
            None => duration,
        };

        let range = TrimRange::new(start.seconds, end)?;
        let actual = range.widened(self.buffer_seconds, duration);

        let output_name =
            rules::trim_output_name(&asset.original_filename, request.output_name.as_deref());
        let output_path = self
            .registry
            .layout()
            .trim_output_path(&request.id, &output_name);

        info!(
            asset = %request.id,
            start = actual.start,
            end = actual.end,
            output = %output_path.display(),
            "trimming"
        );

        // Unique temp target per job; concurrent trims aiming at the same
        // output name race only on the rename, never on the bytes.
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}", request.id.file_prefix()))
            .suffix(".mp4")
            .tempfile_in(self.registry.layout().output_dir())
            .map_err(|e| TrimError::classify_io(e, self.registry.layout().output_dir()))?;

        self.engine
            .encode_range(
                &asset.source_path,
                actual.start,
                actual.end,
                temp.path(),
                &self.options,
            )
            .await?;
        // On the error path above, dropping `temp` removes the partial file.

        temp.persist(&output_path)
            .map_err(|e| TrimError::classify_io(e.error, &output_path))?;

        self.registry.update(&request.id, |a| {
            a.trim_output = Some(TrimOutput {
                path: output_path.clone(),
                display_name: output_name.clone(),
            });
        })?;

        Ok(TrimOutcome {
            output_name,
            output_path,
            range: actual,
        })
    }
}
