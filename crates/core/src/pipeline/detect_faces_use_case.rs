use serde::Serialize;

use crate::detection::domain::detection_result::DetectionResult;
use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::frame_pump::ProgressFn;
use crate::video::domain::frame_source::FrameSource;

/// Faces found in one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetections {
    pub frame: usize,
    pub width: u32,
    pub height: u32,
    pub faces: Vec<DetectionResult>,
}

/// Runs the detector over every frame of a source, in order.
pub struct DetectFacesUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    on_progress: Option<ProgressFn>,
}

impl DetectFacesUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        on_progress: Option<ProgressFn>,
    ) -> Self {
        Self {
            source,
            detector,
            on_progress,
        }
    }

    /// Returns the detections of each frame, one entry per frame.
    pub fn execute(&mut self) -> Result<Vec<FrameDetections>, Box<dyn std::error::Error>> {
        let metadata = self.source.open()?;
        log::info!(
            "Detecting faces in {} frames with {} detector",
            metadata.total_frames,
            self.detector.name()
        );

        let mut results = Vec::with_capacity(metadata.total_frames);
        for frame in self.source.frames() {
            let frame = frame?;
            let faces = self.detector.detect(&frame);
            log::debug!("Frame {}: {} faces", frame.index(), faces.len());
            results.push(FrameDetections {
                frame: frame.index(),
                width: frame.width(),
                height: frame.height(),
                faces,
            });

            if let Some(ref callback) = self.on_progress {
                if !callback(results.len(), metadata.total_frames) {
                    return Err("Cancelled".into());
                }
            }
        }
        self.source.close();

        Ok(results)
    }
}
