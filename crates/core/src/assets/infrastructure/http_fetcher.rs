use std::time::Duration;

use reqwest::blocking::Client;

use crate::assets::domain::asset_error::AssetError;
use crate::assets::domain::asset_fetcher::AssetFetcher;
use crate::shared::constants::USER_AGENT;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking HTTP(S) fetcher. Non-2xx responses are errors.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, AssetError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AssetError::Download {
                url: String::new(),
                source: Box::new(e),
            })?;
        Ok(Self { client })
    }
}

impl AssetFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        log::debug!("GET {url}");
        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map(|b| b.to_vec())
            .map_err(|e| AssetError::Download {
                url: url.to_string(),
                source: Box::new(e),
            })
    }
}
