use std::path::Path;

use serde::Deserialize;

use beauty_face_core::cosmetics::domain::beauty_settings::BeautySettings;
use beauty_face_core::detection::domain::heuristic_tuning::HeuristicTuning;

/// Contents of the optional `--config` JSON file.
///
/// Every section and field is optional; omitted values keep their defaults.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: HeuristicTuning,
    pub beauty: BeautySettings,
}

impl AppConfig {
    /// Loads the config at `path`. A missing file yields the defaults; a
    /// file that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            log::info!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| format!("Invalid config {}: {e}", path.display()).into())
    }
}
