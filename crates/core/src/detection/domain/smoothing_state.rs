use super::detection_result::{BoundingBox, DetectionResult};

/// Weight of the previous baseline when blending a new observation.
pub const DEFAULT_PREVIOUS_WEIGHT: f64 = 0.65;

/// Consecutive misses during which the baseline is still re-emitted.
pub const DEFAULT_MISS_TOLERANCE: u32 = 4;

/// Temporal state of a single-face tracker: the last accepted result and
/// the number of consecutive frames without a plausible match.
///
/// Blending formula: `smoothed = w * previous + (1 - w) * observed`,
/// componentwise on left/top/width/height.
#[derive(Clone, Debug)]
pub struct SmoothingState {
    previous_weight: f64,
    miss_tolerance: u32,
    baseline: Option<DetectionResult>,
    missed_frames: u32,
}

impl SmoothingState {
    pub fn new(previous_weight: f64, miss_tolerance: u32) -> Self {
        Self {
            previous_weight: previous_weight.clamp(0.0, 1.0),
            miss_tolerance,
            baseline: None,
            missed_frames: 0,
        }
    }

    pub fn baseline(&self) -> Option<&DetectionResult> {
        self.baseline.as_ref()
    }

    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    /// Blends an observed box with the baseline box. Without a baseline the
    /// observation is returned unchanged.
    pub fn blend(&self, observed: BoundingBox) -> BoundingBox {
        let Some(prev) = self.baseline.as_ref().map(|b| b.bounding_box) else {
            return observed;
        };
        let w = self.previous_weight;
        let mix = |p: f64, o: f64| w * p + (1.0 - w) * o;
        BoundingBox::new(
            mix(prev.left, observed.left),
            mix(prev.top, observed.top),
            mix(prev.width, observed.width),
            mix(prev.height, observed.height),
        )
    }

    /// Stores a fresh result as the new baseline and clears the miss streak.
    pub fn commit(&mut self, result: DetectionResult) {
        self.missed_frames = 0;
        self.baseline = Some(result);
    }

    /// Records a frame without a plausible face.
    ///
    /// Returns a copy of the baseline while the miss streak is within
    /// tolerance; past it the state is cleared and `None` is returned.
    pub fn record_miss(&mut self) -> Option<DetectionResult> {
        self.missed_frames += 1;
        if self.missed_frames <= self.miss_tolerance {
            if let Some(baseline) = &self.baseline {
                return Some(baseline.clone());
            }
        }
        if self.baseline.is_some() {
            log::debug!(
                "Dropping face baseline after {} consecutive misses",
                self.missed_frames
            );
        }
        self.reset();
        None
    }

    pub fn reset(&mut self) {
        self.baseline = None;
        self.missed_frames = 0;
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIOUS_WEIGHT, DEFAULT_MISS_TOLERANCE)
    }
}
