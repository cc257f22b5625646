use super::asset_error::AssetError;

/// Retrieves the raw bytes behind a URL.
pub trait AssetFetcher: Send {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError>;
}
