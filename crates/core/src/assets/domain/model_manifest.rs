use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub name: String,
    pub url: String,
}

/// Versioned list of model files published by a mirror.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelManifest {
    pub version: String,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

impl ModelManifest {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMetadata {
    pub version: String,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelDefinition {
    #[serde(default)]
    weights_manifest: Vec<WeightGroup>,
}

#[derive(Deserialize)]
struct WeightGroup {
    #[serde(default)]
    paths: Vec<String>,
}

/// Weight shard paths referenced by a JSON model definition.
///
/// Returns an empty list for binary models or JSON without a
/// `weightsManifest` section.
pub fn weight_shards(model_bytes: &[u8]) -> Vec<String> {
    match serde_json::from_slice::<ModelDefinition>(model_bytes) {
        Ok(def) => def
            .weights_manifest
            .into_iter()
            .flat_map(|group| group.paths)
            .collect(),
        Err(_) => Vec::new(),
    }
}
