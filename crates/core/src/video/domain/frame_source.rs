use std::path::PathBuf;

use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

#[derive(Error, Debug)]
pub enum FrameSourceError {
    #[error("no input images given")]
    NoInputs,
    #[error("unsupported image format: {0}")]
    Unsupported(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("frame source read before open")]
    NotOpened,
}

/// Produces camera-like frames in capture order.
///
/// Implementations hide the decoding details; the pipeline only sees
/// `Frame` and `SourceMetadata`.
pub trait FrameSource: Send {
    /// Prepares the source and returns its metadata.
    fn open(&mut self) -> Result<SourceMetadata, FrameSourceError>;

    /// Returns an iterator over frames in order, indexed from 0.
    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, FrameSourceError>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
