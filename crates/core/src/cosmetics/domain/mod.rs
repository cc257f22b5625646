pub mod beauty_settings;
pub mod cosmetic_renderer;
