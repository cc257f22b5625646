use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cosmetics::domain::cosmetic_renderer::CosmeticRenderer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Progress callback: `(frames_done, total_frames)`; returning `false` cancels.
pub type ProgressFn = Box<dyn Fn(usize, usize) -> bool + Send>;

pub struct PumpConfig {
    pub on_progress: Option<ProgressFn>,
    pub cancelled: Arc<AtomicBool>,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpSummary {
    pub frames: usize,
    pub faces: usize,
    pub frames_with_faces: usize,
}

/// Abstracts how the read → detect → render → write loop is executed.
///
/// Frames reach the detector strictly in source order, so the detector's
/// temporal smoothing sees the same sequence a live camera would produce.
pub trait FramePump: Send {
    fn run(
        &self,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        detector: &mut dyn FaceDetector,
        renderer: &dyn CosmeticRenderer,
        metadata: &SourceMetadata,
        config: PumpConfig,
    ) -> Result<PumpSummary, Box<dyn std::error::Error>>;
}
