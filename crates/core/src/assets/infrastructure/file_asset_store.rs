use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::assets::domain::asset_error::AssetError;
use crate::assets::domain::asset_store::AssetStore;
use crate::assets::domain::model_manifest::StoredMetadata;
use crate::shared::constants::APP_DIR_NAME;

const METADATA_FILE: &str = "meta.json";

/// Directory-backed asset cache: `meta.json` plus one file per model.
pub struct FileAssetStore {
    root: PathBuf,
}

impl FileAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at the platform model cache directory.
    pub fn in_default_location() -> Result<Self, AssetError> {
        Ok(Self::new(default_root()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Model names are relative paths below the root; `meta.json` at the
    /// top level is reserved for the version metadata.
    fn model_path(&self, name: &str) -> Result<PathBuf, AssetError> {
        let relative = Path::new(name);
        let valid = !name.is_empty()
            && relative != Path::new(METADATA_FILE)
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(AssetError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Every stored file except the metadata, as `/`-separated names
    /// relative to the root.
    fn stored_names(&self) -> Result<Vec<String>, AssetError> {
        let mut names = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AssetError::Io { path: dir, source: e }),
            };
            for entry in entries {
                let path = entry
                    .map_err(|e| AssetError::Io {
                        path: dir.clone(),
                        source: e,
                    })?
                    .path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                if relative == Path::new(METADATA_FILE) {
                    continue;
                }
                let name = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/BeautyFace/models/`
/// - Linux: `$XDG_CACHE_HOME/BeautyFace/models/` or `~/.cache/BeautyFace/models/`
/// - Windows: `%LOCALAPPDATA%/BeautyFace/models/`
pub fn default_root() -> Result<PathBuf, AssetError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(AssetError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join(APP_DIR_NAME).join("models"))
            .ok_or(AssetError::NoCacheDir)
    }
}

impl AssetStore for FileAssetStore {
    fn metadata(&self) -> Result<Option<StoredMetadata>, AssetError> {
        let path = self.root.join(METADATA_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(|e| AssetError::Io {
            path: path.clone(),
            source: e,
        })?;
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| AssetError::Metadata { path, source: e })
    }

    fn save_metadata(&self, metadata: &StoredMetadata) -> Result<(), AssetError> {
        let path = self.root.join(METADATA_FILE);
        let bytes = serde_json::to_vec_pretty(metadata).map_err(|e| AssetError::Metadata {
            path: path.clone(),
            source: e,
        })?;
        write_atomic(&path, &bytes)
    }

    fn save_model(&self, name: &str, bytes: &[u8]) -> Result<(), AssetError> {
        let path = self.model_path(name)?;
        write_atomic(&path, bytes)?;
        log::debug!("Stored {name} ({} bytes) at {}", bytes.len(), path.display());
        Ok(())
    }

    fn load_model(&self, name: &str) -> Result<Option<Vec<u8>>, AssetError> {
        let path = self.model_path(name)?;
        if !path.exists() {
            return Ok(None);
        }
        fs::read(&path)
            .map(Some)
            .map_err(|e| AssetError::Io { path, source: e })
    }

    fn prune(&self, keep: &[String]) -> Result<Vec<String>, AssetError> {
        let mut removed = Vec::new();
        for name in self.stored_names()? {
            if keep.contains(&name) {
                continue;
            }
            let path = self.root.join(&name);
            fs::remove_file(&path).map_err(|e| AssetError::Io {
                path: path.clone(),
                source: e,
            })?;
            if let Some(parent) = path.parent().filter(|p| *p != self.root.as_path()) {
                // Only succeeds once the directory is empty.
                let _ = fs::remove_dir(parent);
            }
            log::debug!("Removed stale cache entry {name}");
            removed.push(name);
        }
        Ok(removed)
    }
}

/// Writes to `<name>.part` next to `dest`, then renames it into place.
/// The partial file is removed on any error.
fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let temp_path = part_path(dest);
    let result = write_atomic_inner(dest, &temp_path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_atomic_inner(dest: &Path, temp_path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| AssetError::Io { path, source }
    };

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }

    let mut file = fs::File::create(temp_path).map_err(io_err(temp_path))?;
    file.write_all(bytes).map_err(io_err(temp_path))?;
    file.flush().map_err(io_err(temp_path))?;
    drop(file);

    fs::rename(temp_path, dest).map_err(io_err(dest))
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_metadata_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        assert_eq!(store.metadata().unwrap(), None);
    }

    #[test]
    fn test_metadata_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path().join("nested"));
        let meta = StoredMetadata {
            version: "1.4".into(),
            timestamp_ms: 1_700_000_000_000,
        };
        store.save_metadata(&meta).unwrap();
        assert_eq!(store.metadata().unwrap(), Some(meta));
        assert!(!tmp.path().join("nested").join("meta.json.part").exists());
    }

    #[test]
    fn test_corrupt_metadata_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("meta.json"), b"{not json").unwrap();
        let store = FileAssetStore::new(tmp.path());
        assert!(matches!(store.metadata(), Err(AssetError::Metadata { .. })));
    }

    #[test]
    fn test_model_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        store.save_model("face.bin", b"weights").unwrap();
        assert_eq!(store.load_model("face.bin").unwrap(), Some(b"weights".to_vec()));
        assert_eq!(store.load_model("other.bin").unwrap(), None);
    }

    #[test]
    fn test_save_model_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        store.save_model("face.bin", b"old").unwrap();
        store.save_model("face.bin", b"new").unwrap();
        assert_eq!(fs::read(tmp.path().join("face.bin")).unwrap(), b"new");
    }

    #[test]
    fn test_model_in_subdirectory() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        store.save_model("shards/part-1.bin", b"1").unwrap();
        assert!(tmp.path().join("shards").join("part-1.bin").exists());
    }

    #[test]
    fn test_rejects_escaping_names() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        for name in ["", "../evil.bin", "/etc/passwd", "a/../../b"] {
            assert!(
                matches!(store.save_model(name, b"x"), Err(AssetError::InvalidName(_))),
                "{name:?} accepted"
            );
        }
    }

    #[test]
    fn test_rejects_metadata_name() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        let meta = StoredMetadata {
            version: "3".into(),
            timestamp_ms: 1,
        };
        store.save_metadata(&meta).unwrap();

        assert!(matches!(
            store.save_model("meta.json", b"{}"),
            Err(AssetError::InvalidName(_))
        ));
        assert!(matches!(store.load_model("meta.json"), Err(AssetError::InvalidName(_))));
        assert_eq!(store.metadata().unwrap(), Some(meta));

        store.save_model("shards/meta.json", b"shard").unwrap();
        assert_eq!(store.load_model("shards/meta.json").unwrap(), Some(b"shard".to_vec()));
    }

    // ── Pruning ──

    #[test]
    fn test_prune_removes_unlisted_models() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        store
            .save_metadata(&StoredMetadata {
                version: "2".into(),
                timestamp_ms: 1,
            })
            .unwrap();
        store.save_model("face.json", b"new").unwrap();
        store.save_model("old.json", b"old").unwrap();
        store.save_model("shards/old-1.bin", b"1").unwrap();
        fs::write(tmp.path().join("face.bin.part"), b"partial").unwrap();

        let removed = store.prune(&["face.json".to_string()]).unwrap();
        assert_eq!(removed, vec!["face.bin.part", "old.json", "shards/old-1.bin"]);
        assert_eq!(store.load_model("face.json").unwrap(), Some(b"new".to_vec()));
        assert!(store.metadata().unwrap().is_some());
        assert!(!tmp.path().join("shards").exists());
    }

    #[test]
    fn test_prune_keeps_nested_names() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path());
        store.save_model("shards/a.bin", b"a").unwrap();
        store.save_model("shards/b.bin", b"b").unwrap();
        let removed = store.prune(&["shards/a.bin".to_string()]).unwrap();
        assert_eq!(removed, vec!["shards/b.bin"]);
        assert!(tmp.path().join("shards").join("a.bin").exists());
    }

    #[test]
    fn test_prune_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileAssetStore::new(tmp.path().join("absent"));
        assert!(store.prune(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/tmp/m/face.json")),
            PathBuf::from("/tmp/m/face.json.part")
        );
    }

    #[test]
    fn test_default_root_names_app_dir() {
        let root = default_root().unwrap();
        assert!(root.to_string_lossy().contains("BeautyFace"));
        assert!(root.ends_with("models"));
    }
}
