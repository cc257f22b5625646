use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::cosmetics::domain::cosmetic_renderer::CosmeticRenderer;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_pump::{FramePump, ProgressFn, PumpConfig, PumpSummary};
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Camera-filter pipeline: read → detect → render → write.
///
/// Single-use: `execute` consumes the source and sink, so a second call
/// fails.
pub struct RenderEffectsUseCase {
    source: Option<Box<dyn FrameSource>>,
    sink: Option<Box<dyn FrameSink>>,
    detector: Box<dyn FaceDetector>,
    renderer: Box<dyn CosmeticRenderer>,
    pump: Box<dyn FramePump>,
    on_progress: Option<ProgressFn>,
    cancelled: Arc<AtomicBool>,
}

impl RenderEffectsUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        detector: Box<dyn FaceDetector>,
        renderer: Box<dyn CosmeticRenderer>,
        pump: Box<dyn FramePump>,
        on_progress: Option<ProgressFn>,
        cancelled: Option<Arc<AtomicBool>>,
    ) -> Self {
        Self {
            source: Some(source),
            sink: Some(sink),
            detector,
            renderer,
            pump,
            on_progress,
            cancelled: cancelled.unwrap_or_else(|| Arc::new(AtomicBool::new(false))),
        }
    }

    pub fn execute(&mut self) -> Result<PumpSummary, Box<dyn std::error::Error>> {
        let mut source = self.source.take().ok_or("Pipeline already executed")?;
        let sink = self.sink.take().ok_or("Pipeline already executed")?;

        let metadata = source.open()?;
        log::info!(
            "Rendering {} frames ({}x{}) with {} detector",
            metadata.total_frames,
            metadata.width,
            metadata.height,
            self.detector.name()
        );

        let config = PumpConfig {
            on_progress: self.on_progress.take(),
            cancelled: self.cancelled.clone(),
        };
        self.pump.run(
            source,
            sink,
            &mut *self.detector,
            &*self.renderer,
            &metadata,
            config,
        )
    }
}
