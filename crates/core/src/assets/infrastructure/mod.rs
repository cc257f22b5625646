pub mod file_asset_store;
pub mod http_fetcher;
pub mod model_updater;
