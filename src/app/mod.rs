//! Application layer: the operations an outer surface maps onto
//!
//! `VideoLibrary` wires the registry, the media engine and the jobs
//! into the import / trim / duration / preview / delete operations. An
//! HTTP layer or a CLI maps its endpoints directly onto these methods.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::domain::model::{Asset, AssetId, PreviewState};
use crate::domain::rules;
use crate::error::{TrimError, TrimResult};
use crate::jobs::preview::{PreviewJob, PreviewStatus};
use crate::jobs::trim::{TrimJob, TrimOutcome, TrimRequest};
use crate::ports::{EncodeOptions, MediaEngine};
use crate::registry::{AssetRegistry, StorageLayout};

/// The assembled core: registry + engine + jobs.
pub struct VideoLibrary {
    registry: Arc<AssetRegistry>,
    engine: Arc<dyn MediaEngine>,
    trim_job: TrimJob,
    preview_job: Arc<PreviewJob>,
}

impl VideoLibrary {
    /// Assemble the library over a data directory, creating the artifact
    /// directories if missing.
    pub fn new(config: &AppConfig, engine: Arc<dyn MediaEngine>) -> TrimResult<Self> {
        let layout = StorageLayout::new(&config.data_dir());
        layout.ensure_dirs()?;
        let registry = Arc::new(AssetRegistry::new(layout));

        let trim_job = TrimJob::new(
            Arc::clone(&registry),
            Arc::clone(&engine),
            config.trim.buffer_seconds,
        );
        let preview_job = Arc::new(PreviewJob::new(
            Arc::clone(&registry),
            Arc::clone(&engine),
            EncodeOptions::preview(
                config.preview.max_height,
                config.preview.video_bitrate_kbps,
                &config.preview.preset,
            ),
        ));

        Ok(Self {
            registry,
            engine,
            trim_job,
            preview_job,
        })
    }

    pub fn registry(&self) -> &Arc<AssetRegistry> {
        &self.registry
    }

    /// Import a video file: the upload operation.
    ///
    /// Validates the extension before anything is copied, so a rejected
    /// file never creates an asset. The codec is probed once here;
    /// duration stays lazy until first access.
    pub async fn import(&self, source: &Path) -> TrimResult<Asset> {
        let filename = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| TrimError::InvalidInput {
                message: format!("missing file name in {}", source.display()),
            })?;

        if !rules::is_allowed_extension(&filename) {
            return Err(TrimError::InvalidInput {
                message: format!("unsupported file type: {}", filename),
            });
        }
        if !source.is_file() {
            return Err(TrimError::InvalidInput {
                message: format!("no such file: {}", source.display()),
            });
        }

        let id = AssetId::generate();
        let sanitized = rules::sanitize_filename(&filename);
        let dest = self.registry.layout().source_path(&id, &sanitized);

        tokio::fs::copy(source, &dest)
            .await
            .map_err(|e| TrimError::classify_io(e, &dest))?;

        let mut asset = Asset::new(id.clone(), sanitized, dest);
        match self.engine.probe_video_codec(&asset.source_path).await {
            Ok(Some(codec)) => {
                asset.browser_playable = rules::is_browser_playable(&codec);
                debug!(asset = %id, codec = %codec, playable = asset.browser_playable, "codec probed");
            }
            Ok(None) => {}
            Err(e) => {
                // Probe failures fail open to browser-playable
                warn!(asset = %id, error = %e, "codec probe failed, assuming playable");
            }
        }

        if let Err(e) = self.registry.register(asset.clone()) {
            let _ = std::fs::remove_file(&asset.source_path);
            return Err(e);
        }

        info!(asset = %id, file = %asset.original_filename, "imported");
        Ok(asset)
    }

    /// Duration in seconds, probing the file on first access
    pub async fn duration(&self, id: &AssetId) -> TrimResult<f64> {
        let asset = self.registry.lookup(id)?;
        crate::jobs::ensure_duration(&self.registry, self.engine.as_ref(), &asset).await
    }

    /// Cut a clip; see [`TrimJob`]
    pub async fn trim(&self, request: TrimRequest) -> TrimResult<TrimOutcome> {
        self.trim_job.run(request).await
    }

    /// Produce the preview now, if the asset needs one
    pub async fn ensure_preview(&self, id: &AssetId) -> TrimResult<PreviewState> {
        self.preview_job.ensure(id).await
    }

    /// Fire-and-forget preview production, for callers that must return
    /// promptly
    pub fn spawn_preview(&self, id: AssetId) {
        Arc::clone(&self.preview_job).spawn_ensure(id);
    }

    /// Preview availability and playability for status polling
    pub fn preview_status(&self, id: &AssetId) -> TrimResult<PreviewStatus> {
        self.preview_job.status(id)
    }

    /// Best-effort removal of every artifact, then the registry entry.
    /// Deleting an unknown id is a successful no-op.
    pub async fn delete(&self, id: &AssetId) -> TrimResult<()> {
        let asset = match self.registry.lookup(id) {
            Ok(asset) => asset,
            Err(TrimError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        // Each removal is independent: a missing artifact must not keep
        // the others around
        remove_artifact(&asset.source_path);
        for output in self.registry.layout().find_trim_outputs(id) {
            remove_artifact(&output);
        }
        remove_artifact(&self.registry.layout().preview_path(id));

        self.registry.remove(id);
        self.preview_job.forget(id);
        info!(asset = %id, "deleted");
        Ok(())
    }

    /// Every known asset, merging the index with ids found on disk so
    /// the listing survives a restart
    pub fn list(&self) -> Vec<Asset> {
        for (id, _path) in self.registry.layout().scan_asset_ids() {
            if !self.registry.contains(&id) {
                // lookup recovers the entry into the index
                let _ = self.registry.lookup(&id);
            }
        }
        let mut assets = self.registry.list();
        assets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        assets
    }
}

fn remove_artifact(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed artifact"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove artifact"),
    }
}
