//! Jobs: the operations that mutate an asset after creation

pub mod preview;
pub mod trim;

pub use preview::{PreviewJob, PreviewStatus};
pub use trim::{TrimJob, TrimOutcome, TrimRequest};

use crate::domain::model::Asset;
use crate::error::{TrimError, TrimResult};
use crate::ports::MediaEngine;
use crate::registry::AssetRegistry;

/// Duration of an asset, probing the source on first access and caching
/// the result in the registry. Duration probing is deliberately lazy:
/// it is slow for large files and must not block the import path.
pub(crate) async fn ensure_duration(
    registry: &AssetRegistry,
    engine: &dyn MediaEngine,
    asset: &Asset,
) -> TrimResult<f64> {
    if asset.has_duration() {
        return Ok(asset.duration_seconds);
    }
    if !asset.source_path.exists() {
        return Err(TrimError::SourceMissing {
            path: asset.source_path.display().to_string(),
        });
    }
    let duration = engine.probe_duration(&asset.source_path).await?;
    registry.update(&asset.id, |a| a.duration_seconds = duration)?;
    Ok(duration)
}
