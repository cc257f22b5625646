use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::assets::domain::asset_error::AssetError;
use crate::assets::domain::asset_fetcher::AssetFetcher;
use crate::assets::domain::asset_store::AssetStore;
use crate::assets::domain::model_manifest::{weight_shards, ModelManifest, StoredMetadata};
use crate::shared::constants::{MODEL_BASE_URL, MODEL_BASE_URL_FALLBACKS, MODEL_MANIFEST_NAME};

/// Progress report: `completed` of `total` manifest models are stored.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateProgress {
    pub completed: usize,
    pub total: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    UpToDate,
    /// Names of every stored file, weight shards included, in download order.
    Updated { downloaded: Vec<String> },
}

/// Keeps the local model cache in sync with the published manifest.
pub struct ModelUpdater {
    fetcher: Box<dyn AssetFetcher>,
    store: Box<dyn AssetStore>,
    mirrors: Vec<String>,
    force: bool,
}

impl ModelUpdater {
    /// Updater using the default mirror followed by its fallbacks.
    pub fn new(fetcher: Box<dyn AssetFetcher>, store: Box<dyn AssetStore>) -> Self {
        let mirrors = std::iter::once(MODEL_BASE_URL)
            .chain(MODEL_BASE_URL_FALLBACKS.iter().copied())
            .map(String::from)
            .collect();
        Self::with_mirrors(fetcher, store, mirrors)
    }

    /// Updater that tries exactly the given base URLs, in order.
    pub fn with_mirrors(
        fetcher: Box<dyn AssetFetcher>,
        store: Box<dyn AssetStore>,
        mirrors: Vec<String>,
    ) -> Self {
        let mirrors = mirrors
            .into_iter()
            .map(|m| format!("{}/", m.trim_end_matches('/')))
            .collect();
        Self {
            fetcher,
            store,
            mirrors,
            force: false,
        }
    }

    /// Re-download even when the stored version matches.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn mirrors(&self) -> &[String] {
        &self.mirrors
    }

    pub fn check_for_updates(
        &self,
        on_progress: &mut dyn FnMut(&UpdateProgress),
    ) -> Result<UpdateOutcome, AssetError> {
        let (base, manifest) = self.fetch_manifest()?;
        let total = manifest.models.len();

        if !self.force {
            if let Some(meta) = self.store.metadata()? {
                if meta.version == manifest.version {
                    log::info!("Models are up to date (version {})", manifest.version);
                    on_progress(&UpdateProgress {
                        completed: total,
                        total,
                        message: "up to date".into(),
                    });
                    return Ok(UpdateOutcome::UpToDate);
                }
            }
        }

        log::info!("Downloading {total} models for version {}", manifest.version);
        let mut seen = HashSet::new();
        let mut downloaded = Vec::new();

        for (completed, model) in manifest.models.iter().enumerate() {
            on_progress(&UpdateProgress {
                completed,
                total,
                message: format!("downloading {}", model.name),
            });

            let url = resolve_url(&base, &model.url);
            let bytes = self.fetcher.fetch(&url)?;
            self.store.save_model(&model.name, &bytes)?;
            if seen.insert(model.name.clone()) {
                downloaded.push(model.name.clone());
            }

            self.download_shards(&url, &bytes, &mut seen, &mut downloaded);

            on_progress(&UpdateProgress {
                completed: completed + 1,
                total,
                message: format!("{} downloaded", model.name),
            });
        }

        self.store.save_metadata(&StoredMetadata {
            version: manifest.version.clone(),
            timestamp_ms: now_ms(),
        })?;
        log::info!("Model cache updated to version {}", manifest.version);

        let keep: Vec<String> = seen.into_iter().collect();
        match self.store.prune(&keep) {
            Ok(removed) if !removed.is_empty() => {
                log::info!("Removed {} stale cache entries", removed.len())
            }
            Ok(_) => {}
            Err(e) => log::warn!("Could not prune model cache: {e}"),
        }

        Ok(UpdateOutcome::Updated { downloaded })
    }

    fn fetch_manifest(&self) -> Result<(String, ModelManifest), AssetError> {
        let mut failures = Vec::new();
        for base in &self.mirrors {
            let url = format!("{base}{MODEL_MANIFEST_NAME}");
            log::info!("Fetching manifest from {url}");
            let parsed = self.fetcher.fetch(&url).and_then(|bytes| {
                ModelManifest::from_json(&bytes).map_err(|e| AssetError::InvalidManifest {
                    url: url.clone(),
                    source: e,
                })
            });
            match parsed {
                Ok(manifest) => return Ok((base.clone(), manifest)),
                Err(e) => {
                    log::warn!("Mirror failed: {e}");
                    failures.push(e.to_string());
                }
            }
        }
        Err(AssetError::AllMirrorsFailed { failures })
    }

    /// Shard failures are logged and skipped; the model file itself is kept.
    fn download_shards(
        &self,
        model_url: &str,
        model_bytes: &[u8],
        seen: &mut HashSet<String>,
        downloaded: &mut Vec<String>,
    ) {
        let shard_base = parent_url(model_url);
        for shard in weight_shards(model_bytes) {
            if !seen.insert(shard.clone()) {
                continue;
            }
            let url = resolve_url(shard_base, &shard);
            let stored = self
                .fetcher
                .fetch(&url)
                .and_then(|bytes| self.store.save_model(&shard, &bytes));
            match stored {
                Ok(()) => downloaded.push(shard),
                Err(e) => log::warn!("Skipping weight shard {shard}: {e}"),
            }
        }
    }
}

/// Absolute URLs pass through; relative ones are joined onto `base`.
fn resolve_url(base: &str, url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    let relative = url.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", base.trim_end_matches('/'), relative)
}

fn parent_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(i) => &url[..=i],
        None => url,
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
