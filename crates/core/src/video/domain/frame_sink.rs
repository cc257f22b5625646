use crate::shared::frame::Frame;

/// Consumes processed frames in order.
pub trait FrameSink: Send {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes anything buffered. Called once after the last frame.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
