use crate::detection::domain::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Domain interface for face detection backends.
///
/// Detection is total: a backend that cannot find a face, or cannot run at
/// all, returns an empty vector. Implementations may keep state across
/// frames (smoothing, throttling), hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Vec<DetectionResult>;

    /// Short backend name for logs and CLI output.
    fn name(&self) -> &'static str;
}

/// Error type surfaced by platform detection capabilities.
pub type PlatformError = Box<dyn std::error::Error + Send + Sync>;

/// A face detection capability provided by the host platform.
///
/// Unlike [`FaceDetector`] it may fail; callers decide how to degrade.
pub trait PlatformFaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<DetectionResult>, PlatformError>;
}
