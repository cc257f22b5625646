use super::asset_error::AssetError;
use super::model_manifest::StoredMetadata;

/// Persistent cache for downloaded model files and the manifest version
/// they belong to.
pub trait AssetStore: Send {
    /// Metadata of the last completed update, `None` if nothing is cached.
    fn metadata(&self) -> Result<Option<StoredMetadata>, AssetError>;

    fn save_metadata(&self, metadata: &StoredMetadata) -> Result<(), AssetError>;

    fn save_model(&self, name: &str, bytes: &[u8]) -> Result<(), AssetError>;

    fn load_model(&self, name: &str) -> Result<Option<Vec<u8>>, AssetError>;

    /// Deletes every stored model not named in `keep`. Returns the removed
    /// names.
    fn prune(&self, keep: &[String]) -> Result<Vec<String>, AssetError>;
}
