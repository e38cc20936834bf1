//! Asset registry: the in-memory index over the artifact store
//!
//! The filesystem is the source of truth; this map is a cache over it.
//! A lookup miss falls back to scanning the uploads directory so the
//! system keeps working across a process restart, at the cost of losing
//! metadata richer than the path (duration is re-probed on demand).

pub mod locator;

pub use locator::StorageLayout;

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::domain::model::{Asset, AssetId, PreviewState, TrimOutput};
use crate::error::{TrimError, TrimResult};

/// Shared mutable map from id to asset, guarded by one coarse lock.
/// The lock is never held across an await point.
pub struct AssetRegistry {
    layout: StorageLayout,
    assets: RwLock<HashMap<AssetId, Asset>>,
}

impl AssetRegistry {
    pub fn new(layout: StorageLayout) -> Self {
        Self {
            layout,
            assets: RwLock::new(HashMap::new()),
        }
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Insert a new asset. Generated ids should never collide, but a
    /// duplicate is still rejected rather than silently replaced.
    pub fn register(&self, asset: Asset) -> TrimResult<()> {
        let mut assets = self.assets.write().unwrap();
        if assets.contains_key(&asset.id) {
            return Err(TrimError::DuplicateId {
                id: asset.id.to_string(),
            });
        }
        assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Memory first; on a miss, fall back to the uploads-directory scan
    /// and reconstruct a minimal asset so the id keeps resolving after a
    /// restart.
    pub fn lookup(&self, id: &AssetId) -> TrimResult<Asset> {
        if let Some(asset) = self.assets.read().unwrap().get(id) {
            return Ok(asset.clone());
        }
        self.recover(id).ok_or_else(|| TrimError::NotFound {
            id: id.to_string(),
        })
    }

    /// Whether the id is currently indexed (no disk fallback)
    pub fn contains(&self, id: &AssetId) -> bool {
        self.assets.read().unwrap().contains_key(id)
    }

    /// Drop the in-memory entry. File removal belongs to Cleanup and
    /// never happens here.
    pub fn remove(&self, id: &AssetId) -> Option<Asset> {
        self.assets.write().unwrap().remove(id)
    }

    /// Apply a mutation to an asset under the registry guard and return
    /// the updated snapshot. Only post-creation mutable fields (duration,
    /// playability, preview state, trim output) should change here.
    pub fn update<F>(&self, id: &AssetId, mutate: F) -> TrimResult<Asset>
    where
        F: FnOnce(&mut Asset),
    {
        let mut assets = self.assets.write().unwrap();
        let asset = assets.get_mut(id).ok_or_else(|| TrimError::NotFound {
            id: id.to_string(),
        })?;
        mutate(asset);
        Ok(asset.clone())
    }

    /// Snapshot of every indexed asset
    pub fn list(&self) -> Vec<Asset> {
        self.assets.read().unwrap().values().cloned().collect()
    }

    /// Rebuild a registry entry from the filesystem alone.
    ///
    /// The recovered asset carries the duration sentinel. Derived
    /// artifacts are re-attached from their prefixed files; an existing
    /// preview also implies the source was not browser-playable, since
    /// previews are only ever produced for unplayable codecs.
    fn recover(&self, id: &AssetId) -> Option<Asset> {
        let source = self.layout.find_source(id)?;
        let filename = self.layout.recover_filename(id, &source);
        let mut asset = Asset::new(id.clone(), filename, source);

        if self.layout.preview_path(id).exists() {
            asset.preview_state = PreviewState::Ready;
            asset.browser_playable = false;
        }
        if let Some(output_path) = self.layout.find_trim_outputs(id).into_iter().next() {
            let display_name = self.layout.recover_filename(id, &output_path);
            asset.trim_output = Some(TrimOutput {
                path: output_path,
                display_name,
            });
        }

        debug!(asset = %id, "recovered asset from disk scan");
        let mut assets = self.assets.write().unwrap();
        let entry = assets.entry(id.clone()).or_insert(asset);
        Some(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn registry() -> (TempDir, AssetRegistry) {
        let tmp = TempDir::new().expect("temp dir");
        let layout = StorageLayout::new(tmp.path());
        layout.ensure_dirs().expect("dirs");
        (tmp, AssetRegistry::new(layout))
    }

    fn asset(registry: &AssetRegistry, id: &AssetId, name: &str) -> Asset {
        let path = registry.layout().source_path(id, name);
        std::fs::write(&path, b"bytes").expect("write source");
        Asset::new(id.clone(), name.to_string(), path)
    }

    #[test]
    fn test_register_and_lookup() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        registry.register(asset(&registry, &id, "clip.mov")).unwrap();

        let found = registry.lookup(&id).unwrap();
        assert_eq!(found.original_filename, "clip.mov");
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        registry.register(asset(&registry, &id, "clip.mov")).unwrap();

        let err = registry
            .register(asset(&registry, &id, "clip.mov"))
            .unwrap_err();
        assert!(matches!(err, TrimError::DuplicateId { .. }));
    }

    #[test]
    fn test_lookup_unknown_is_not_found() {
        let (_tmp, registry) = registry();
        let err = registry.lookup(&AssetId::generate()).unwrap_err();
        assert!(matches!(err, TrimError::NotFound { .. }));
    }

    #[test]
    fn test_lookup_falls_back_to_disk_scan() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        // File on disk, nothing in memory: the restart case
        let path = registry.layout().source_path(&id, "clip.mov");
        std::fs::write(&path, b"bytes").unwrap();

        let recovered = registry.lookup(&id).unwrap();
        assert_eq!(recovered.source_path, path);
        assert_eq!(recovered.original_filename, "clip.mov");
        assert!(!recovered.has_duration());
        // Recovered entries re-enter the index
        assert!(registry.contains(&id));
    }

    #[test]
    fn test_recover_infers_preview_state() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        std::fs::write(registry.layout().source_path(&id, "clip.mov"), b"v").unwrap();
        std::fs::write(registry.layout().preview_path(&id), b"p").unwrap();

        let recovered = registry.lookup(&id).unwrap();
        assert_eq!(recovered.preview_state, PreviewState::Ready);
        assert!(!recovered.browser_playable);
    }

    #[test]
    fn test_remove_leaves_files_in_place() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        let entry = asset(&registry, &id, "clip.mov");
        let source: PathBuf = entry.source_path.clone();
        registry.register(entry).unwrap();

        registry.remove(&id);
        assert!(!registry.contains(&id));
        assert!(source.exists());
    }

    #[test]
    fn test_update_mutates_under_guard() {
        let (_tmp, registry) = registry();
        let id = AssetId::generate();
        registry.register(asset(&registry, &id, "clip.mov")).unwrap();

        let updated = registry
            .update(&id, |a| a.duration_seconds = 10.0)
            .unwrap();
        assert_eq!(updated.duration_seconds, 10.0);
        assert_eq!(registry.lookup(&id).unwrap().duration_seconds, 10.0);
    }
}
