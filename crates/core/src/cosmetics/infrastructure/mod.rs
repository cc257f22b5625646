pub mod color_filter;
pub mod cpu_cosmetic_renderer;
pub mod gaussian;
pub mod overlay;
