use crate::detection::domain::detection_result::DetectionResult;
use crate::shared::frame::Frame;

/// Domain interface for drawing cosmetic effects onto a frame.
///
/// Implementations modify the frame in-place. Faces are read-only input:
/// renderers use the bounding box and pick landmarks by kind. An empty face
/// list still gets the frame-wide effects.
pub trait CosmeticRenderer: Send {
    fn render(&self, frame: &mut Frame, faces: &[DetectionResult]);
}
