pub mod asset_error;
pub mod asset_fetcher;
pub mod asset_store;
pub mod model_manifest;
