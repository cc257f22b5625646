use crate::detection::domain::detection_result::{BoundingBox, DetectionResult};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::synthesize_landmarks;
use crate::detection::domain::heuristic_tuning::HeuristicTuning;
use crate::detection::domain::skin_classifier::is_skin;
use crate::detection::domain::smoothing_state::SmoothingState;
use crate::shared::frame::Frame;

use super::sample_buffer::SampleBuffer;

/// Skin-colour face localiser used when no platform detector is available.
///
/// Per frame: downscale into a reusable buffer, classify every sample as
/// skin or not, take the bounding extremes of all skin samples as one
/// region, pad it to approximate the full face, and blend it with the
/// previous result. Frames with implausible skin coverage count as misses;
/// the last result is re-emitted for a few of them before being dropped.
///
/// Disjoint skin clusters are merged into a single region, so at most one
/// face is reported per frame.
pub struct HeuristicFaceDetector {
    tuning: HeuristicTuning,
    buffer: SampleBuffer,
    state: SmoothingState,
}

impl HeuristicFaceDetector {
    pub fn new(tuning: HeuristicTuning) -> Self {
        let state = SmoothingState::new(tuning.previous_weight, tuning.miss_tolerance);
        Self {
            tuning,
            buffer: SampleBuffer::new(),
            state,
        }
    }

    pub fn smoothing_state(&self) -> &SmoothingState {
        &self.state
    }

    /// Maps the skin extent from sample space to a padded, clamped frame box.
    fn frame_box(&self, stats: &SkinStats, frame_width: f64, frame_height: f64) -> BoundingBox {
        let scale_x = frame_width / self.buffer.width() as f64;
        let scale_y = frame_height / self.buffer.height() as f64;

        let left = stats.min_x as f64 * scale_x;
        let right = (stats.max_x + 1) as f64 * scale_x;
        let top = stats.min_y as f64 * scale_y;
        let bottom = (stats.max_y + 1) as f64 * scale_y;

        let pad_x = (right - left) * self.tuning.padding_x;
        let pad_y = (bottom - top) * self.tuning.padding_y;

        BoundingBox::from_edges_clamped(
            left - pad_x,
            top - pad_y,
            right + pad_x,
            bottom + pad_y,
            frame_width,
            frame_height,
        )
    }
}

impl Default for HeuristicFaceDetector {
    fn default() -> Self {
        Self::new(HeuristicTuning::default())
    }
}

impl FaceDetector for HeuristicFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Vec<DetectionResult> {
        if !frame.has_color_pixels() {
            return Vec::new();
        }

        let (sample_w, sample_h) = self
            .tuning
            .sample_dimensions(frame.width(), frame.height());
        self.buffer.resample(frame, sample_w, sample_h);

        let stats = SkinStats::collect(&self.buffer);
        let total = sample_w as f64 * sample_h as f64;
        let coverage = stats.count as f64 / total;

        if stats.count == 0 || !self.tuning.coverage_is_plausible(coverage) {
            log::trace!(
                "Frame {}: skin coverage {:.4} outside plausible band",
                frame.index(),
                coverage
            );
            return self.state.record_miss().into_iter().collect();
        }

        let (frame_w, frame_h) = (frame.width() as f64, frame.height() as f64);
        let observed = self.frame_box(&stats, frame_w, frame_h);
        let smoothed = self.state.blend(observed);
        let landmarks = synthesize_landmarks(&smoothed, frame_w, frame_h);
        let result = DetectionResult::new(smoothed, landmarks);

        if let Some((cx, cy)) = stats.centroid() {
            log::trace!(
                "Frame {}: {} skin samples, coverage {:.3}, centroid ({:.1}, {:.1})",
                frame.index(),
                stats.count,
                coverage,
                cx,
                cy
            );
        }

        self.state.commit(result.clone());
        vec![result]
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Aggregate statistics of skin samples in sample-buffer coordinates.
struct SkinStats {
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
    count: u64,
    sum_x: u64,
    sum_y: u64,
}

impl SkinStats {
    fn collect(buffer: &SampleBuffer) -> Self {
        let mut stats = Self {
            min_x: u32::MAX,
            max_x: 0,
            min_y: u32::MAX,
            max_y: 0,
            count: 0,
            sum_x: 0,
            sum_y: 0,
        };

        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                if is_skin(buffer.rgb(x, y)) {
                    stats.min_x = stats.min_x.min(x);
                    stats.max_x = stats.max_x.max(x);
                    stats.min_y = stats.min_y.min(y);
                    stats.max_y = stats.max_y.max(y);
                    stats.count += 1;
                    stats.sum_x += x as u64;
                    stats.sum_y += y as u64;
                }
            }
        }
        stats
    }

    fn centroid(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        Some((self.sum_x as f64 / n, self.sum_y as f64 / n))
    }
}
