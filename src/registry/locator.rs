//! Artifact locator: the on-disk naming grammar
//!
//! Three directories, every file name-prefixed by the owning asset id:
//!
//! ```text
//! {data_dir}/uploads/{id}_{original_filename}
//! {data_dir}/output/{id}_{output_name}
//! {data_dir}/previews/{id}_preview.mp4
//! ```
//!
//! The prefix is the whole persistence story: any artifact can be
//! located from the identifier alone, which is what lets the in-memory
//! registry be rebuilt by scanning after a process restart.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::domain::model::AssetId;
use crate::error::{TrimError, TrimResult};

/// Suffix of the canonical preview artifact
const PREVIEW_FILENAME: &str = "preview.mp4";

/// The three artifact directories and the naming rules tying them together
#[derive(Debug, Clone)]
pub struct StorageLayout {
    uploads_dir: PathBuf,
    output_dir: PathBuf,
    previews_dir: PathBuf,
}

impl StorageLayout {
    /// Lay out the artifact directories under a data directory
    pub fn new(data_dir: &Path) -> Self {
        Self {
            uploads_dir: data_dir.join("uploads"),
            output_dir: data_dir.join("output"),
            previews_dir: data_dir.join("previews"),
        }
    }

    /// Create all three directories if missing
    pub fn ensure_dirs(&self) -> TrimResult<()> {
        for dir in [&self.uploads_dir, &self.output_dir, &self.previews_dir] {
            std::fs::create_dir_all(dir).map_err(|e| TrimError::classify_io(e, dir))?;
        }
        Ok(())
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn previews_dir(&self) -> &Path {
        &self.previews_dir
    }

    /// Where an uploaded source lands
    pub fn source_path(&self, id: &AssetId, sanitized_name: &str) -> PathBuf {
        self.uploads_dir
            .join(format!("{}{}", id.file_prefix(), sanitized_name))
    }

    /// Where a trim output lands
    pub fn trim_output_path(&self, id: &AssetId, output_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}{}", id.file_prefix(), output_name))
    }

    /// The canonical preview path; there is at most one per asset
    pub fn preview_path(&self, id: &AssetId) -> PathBuf {
        self.previews_dir
            .join(format!("{}{}", id.file_prefix(), PREVIEW_FILENAME))
    }

    /// Recovery scan: the uploaded source for `id`, found by name prefix
    pub fn find_source(&self, id: &AssetId) -> Option<PathBuf> {
        find_by_prefix(&self.uploads_dir, &id.file_prefix())
            .into_iter()
            .next()
    }

    /// Every trim output belonging to `id`
    pub fn find_trim_outputs(&self, id: &AssetId) -> Vec<PathBuf> {
        find_by_prefix(&self.output_dir, &id.file_prefix())
    }

    /// Original filename recovered from a source path (text after the
    /// id prefix)
    pub fn recover_filename(&self, id: &AssetId, source: &Path) -> String {
        source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .and_then(|name| name.strip_prefix(&id.file_prefix()).map(str::to_string))
            .unwrap_or_else(|| "upload".to_string())
    }

    /// All asset ids present in the uploads directory, with their
    /// source paths. Ids contain no underscore, so the first one
    /// separates id from filename unambiguously.
    pub fn scan_asset_ids(&self) -> Vec<(AssetId, PathBuf)> {
        let mut found = Vec::new();
        for entry in WalkDir::new(&self.uploads_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some((raw_id, _rest)) = name.split_once('_') {
                if let Ok(id) = AssetId::parse(raw_id) {
                    found.push((id, entry.into_path()));
                }
            }
        }
        found
    }
}

fn find_by_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> (TempDir, StorageLayout) {
        let tmp = TempDir::new().expect("temp dir");
        let layout = StorageLayout::new(tmp.path());
        layout.ensure_dirs().expect("dirs");
        (tmp, layout)
    }

    #[test]
    fn test_naming_grammar() {
        let (_tmp, layout) = layout();
        let id = AssetId::parse("abc-123").unwrap();

        assert!(layout
            .source_path(&id, "clip.mov")
            .ends_with("uploads/abc-123_clip.mov"));
        assert!(layout
            .trim_output_path(&id, "clip_trimmed.mp4")
            .ends_with("output/abc-123_clip_trimmed.mp4"));
        assert!(layout
            .preview_path(&id)
            .ends_with("previews/abc-123_preview.mp4"));
    }

    #[test]
    fn test_find_source_by_prefix() {
        let (_tmp, layout) = layout();
        let id = AssetId::parse("abc-123").unwrap();
        let other = AssetId::parse("zzz-999").unwrap();

        std::fs::write(layout.source_path(&id, "clip.mov"), b"x").unwrap();
        std::fs::write(layout.source_path(&other, "other.mp4"), b"x").unwrap();

        let found = layout.find_source(&id).expect("source found");
        assert!(found.ends_with("abc-123_clip.mov"));
        assert!(layout.find_source(&AssetId::parse("nope").unwrap()).is_none());
    }

    #[test]
    fn test_recover_filename() {
        let (_tmp, layout) = layout();
        let id = AssetId::parse("abc-123").unwrap();
        let source = layout.source_path(&id, "clip.mov");
        assert_eq!(layout.recover_filename(&id, &source), "clip.mov");
    }

    #[test]
    fn test_scan_asset_ids() {
        let (_tmp, layout) = layout();
        let a = AssetId::parse("aaa-111").unwrap();
        let b = AssetId::parse("bbb-222").unwrap();
        std::fs::write(layout.source_path(&a, "one.mp4"), b"x").unwrap();
        std::fs::write(layout.source_path(&b, "two_with_underscores.mp4"), b"x").unwrap();

        let mut ids: Vec<String> = layout
            .scan_asset_ids()
            .into_iter()
            .map(|(id, _)| id.to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["aaa-111".to_string(), "bbb-222".to_string()]);
    }
}
