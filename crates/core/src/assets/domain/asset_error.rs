use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid manifest at {url}: {source}")]
    InvalidManifest {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to download manifest from all mirrors:\n{}", .failures.join("\n"))]
    AllMirrorsFailed { failures: Vec<String> },
    #[error("invalid asset name {0:?}")]
    InvalidName(String),
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt metadata at {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
