//! Preview job: at-most-once browser-compatible derived copies
//!
//! An asset needs a preview when its probed codec is outside the
//! browser allow-list. The canonical preview file doubles as the
//! completion marker: existence means done, and publication is a single
//! atomic rename, so a reader can never observe a partial file there.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::domain::model::{AssetId, PreviewState};
use crate::error::{TrimError, TrimResult};
use crate::ports::{EncodeOptions, MediaEngine};
use crate::registry::AssetRegistry;

/// Answer to a preview status poll
#[derive(Debug, Clone, Serialize)]
pub struct PreviewStatus {
    /// Whether the preview file exists
    pub exists: bool,
    /// Whether the source codec is browser-playable
    pub playable: bool,
    /// Which stream a player should request: the preview iff the source
    /// is unplayable and the preview is ready
    pub use_preview: bool,
    pub state: PreviewState,
}

/// Produces browser-compatible derived copies, one per asset at most.
pub struct PreviewJob {
    registry: Arc<AssetRegistry>,
    engine: Arc<dyn MediaEngine>,
    options: EncodeOptions,
    /// Per-asset mutexes so two near-simultaneous requests launch
    /// exactly one transcode
    locks: Mutex<HashMap<AssetId, Arc<AsyncMutex<()>>>>,
}

impl PreviewJob {
    pub fn new(
        registry: Arc<AssetRegistry>,
        engine: Arc<dyn MediaEngine>,
        options: EncodeOptions,
    ) -> Self {
        Self {
            registry,
            engine,
            options,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, id: &AssetId) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(id.clone()).or_default().clone()
    }

    /// Drop the lock entry for a deleted asset
    pub fn forget(&self, id: &AssetId) {
        self.locks.lock().unwrap().remove(id);
    }

    /// Idempotently make sure a preview exists if the asset needs one.
    /// Returns the resulting preview state.
    pub async fn ensure(&self, id: &AssetId) -> TrimResult<PreviewState> {
        let asset = self.registry.lookup(id)?;
        if asset.browser_playable {
            // No preview needed; whatever state exists stands
            return Ok(asset.preview_state);
        }

        let lock = self.lock_for(id);
        let _guard = lock.lock().await;

        // Existence check under the per-asset lock: a finished preview
        // means a previous run already published it
        let preview_path = self.registry.layout().preview_path(id);
        if preview_path.exists() {
            let asset = self
                .registry
                .update(id, |a| a.preview_state = PreviewState::Ready)?;
            return Ok(asset.preview_state);
        }

        if !asset.source_path.exists() {
            return Err(TrimError::SourceMissing {
                path: asset.source_path.display().to_string(),
            });
        }

        self.registry
            .update(id, |a| a.preview_state = PreviewState::Pending)?;

        match self.transcode(&asset, &preview_path).await {
            Ok(()) => {
                info!(asset = %id, preview = %preview_path.display(), "preview ready");
                self.registry
                    .update(id, |a| a.preview_state = PreviewState::Ready)?;
                Ok(PreviewState::Ready)
            }
            Err(e) => {
                // Revert so a later attempt starts clean
                let _ = self
                    .registry
                    .update(id, |a| a.preview_state = PreviewState::Absent);
                Err(e)
            }
        }
    }

    /// Launch `ensure` detached so the caller returns promptly; status
    /// polling observes the pending to ready transition.
    pub fn spawn_ensure(self: Arc<Self>, id: AssetId) {
        tokio::spawn(async move {
            if let Err(e) = self.ensure(&id).await {
                warn!(asset = %id, error = %e, "background preview transcode failed");
            }
        });
    }

    /// Report preview availability for a player deciding which stream to
    /// request
    pub fn status(&self, id: &AssetId) -> TrimResult<PreviewStatus> {
        let asset = self.registry.lookup(id)?;
        let exists = self.registry.layout().preview_path(id).exists();
        Ok(PreviewStatus {
            exists,
            playable: asset.browser_playable,
            use_preview: !asset.browser_playable && exists,
            state: asset.preview_state,
        })
    }

    async fn transcode(
        &self,
        asset: &crate::domain::model::Asset,
        preview_path: &Path,
    ) -> TrimResult<()> {
        let duration =
            super::ensure_duration(&self.registry, self.engine.as_ref(), asset).await?;

        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}", asset.id.file_prefix()))
            .suffix(".mp4")
            .tempfile_in(self.registry.layout().previews_dir())
            .map_err(|e| TrimError::classify_io(e, self.registry.layout().previews_dir()))?;

        self.engine
            .encode_range(
                &asset.source_path,
                0.0,
                duration,
                temp.path(),
                &self.options,
            )
            .await?;
        // A failed encode drops `temp` here, deleting the partial file;
        // the canonical path never sees it.

        temp.persist(preview_path)
            .map_err(|e| TrimError::classify_io(e.error, preview_path))?;
        Ok(())
    }
}
