pub const APP_DIR_NAME: &str = "BeautyFace";

pub const MODEL_MANIFEST_NAME: &str = "models.json";
pub const MODEL_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/@vladmandic/human-models/models/";
pub const MODEL_BASE_URL_FALLBACKS: &[&str] = &[
    "https://fastly.jsdelivr.net/npm/@vladmandic/human-models/models/",
    "https://unpkg.com/@vladmandic/human-models@latest/models/",
    "https://raw.githubusercontent.com/vladmandic/human-models/main/models/",
];
pub const USER_AGENT: &str = "beauty-face-model-downloader/1.0";

/// Minimum interval between two platform detector runs.
pub const PLATFORM_DETECT_COOLDOWN_MS: u64 = 120;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
