use std::path::PathBuf;

/// Shape of a frame source, known before any frame is decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    /// Dimensions of the first frame; later frames may differ.
    pub width: u32,
    pub height: u32,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}
