use serde::{Deserialize, Serialize};

use super::smoothing_state::{DEFAULT_MISS_TOLERANCE, DEFAULT_PREVIOUS_WEIGHT};

/// Empirically chosen constants of the skin-colour detector.
///
/// None of them has a derivation; they are kept numerically stable so
/// results stay comparable, and can be overridden from a config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicTuning {
    /// Longest side of the sample buffer.
    pub target_size: u32,
    /// Lower bound for each sample buffer side.
    pub min_sample_size: u32,
    /// Coverage below this is treated as noise.
    pub min_coverage: f64,
    /// Coverage above this means the whole scene is skin-toned.
    pub max_coverage: f64,
    /// Horizontal padding on each side, as a fraction of the skin extent width.
    pub padding_x: f64,
    /// Vertical padding above and below, as a fraction of the skin extent height.
    pub padding_y: f64,
    pub previous_weight: f64,
    pub miss_tolerance: u32,
}

impl Default for HeuristicTuning {
    fn default() -> Self {
        Self {
            target_size: 160,
            min_sample_size: 32,
            min_coverage: 0.015,
            max_coverage: 0.60,
            padding_x: 0.20,
            padding_y: 0.25,
            previous_weight: DEFAULT_PREVIOUS_WEIGHT,
            miss_tolerance: DEFAULT_MISS_TOLERANCE,
        }
    }
}

impl HeuristicTuning {
    /// Sample buffer dimensions for a frame: longest side at most
    /// `target_size` (never upscaled), each side at least `min_sample_size`.
    pub fn sample_dimensions(&self, frame_width: u32, frame_height: u32) -> (u32, u32) {
        let longest = frame_width.max(frame_height).max(1) as f64;
        let scale = (self.target_size as f64 / longest).min(1.0);
        let side = |dim: u32| ((dim as f64 * scale).round() as u32).max(self.min_sample_size);
        (side(frame_width), side(frame_height))
    }

    pub fn coverage_is_plausible(&self, coverage: f64) -> bool {
        coverage >= self.min_coverage && coverage <= self.max_coverage
    }
}
