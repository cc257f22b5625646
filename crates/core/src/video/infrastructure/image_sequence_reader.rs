use std::path::{Path, PathBuf};

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::{FrameSource, FrameSourceError};

/// Replays a list of still images as consecutive camera frames.
///
/// Images are decoded lazily with the `image` crate and converted to RGB.
/// Metadata reports the first image's dimensions.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    opened: bool,
}

impl ImageSequenceReader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            opened: false,
        }
    }
}

/// True when the extension is one of the decodable still-image formats.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn decode(path: &Path, index: usize) -> Result<Frame, FrameSourceError> {
    let img = image::open(path)
        .map_err(|e| FrameSourceError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        .to_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self) -> Result<SourceMetadata, FrameSourceError> {
        let first = self.paths.first().ok_or(FrameSourceError::NoInputs)?;
        if let Some(bad) = self.paths.iter().find(|p| !is_supported_image(p)) {
            return Err(FrameSourceError::Unsupported(bad.clone()));
        }

        let (width, height) =
            image::image_dimensions(first).map_err(|e| FrameSourceError::Decode {
                path: first.clone(),
                source: e,
            })?;

        self.opened = true;
        log::debug!("Opened {} images, first is {width}x{height}", self.paths.len());
        Ok(SourceMetadata {
            width,
            height,
            total_frames: self.paths.len(),
            source_path: Some(first.clone()),
        })
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, FrameSourceError>> + '_> {
        if !self.opened {
            return Box::new(std::iter::once(Err(FrameSourceError::NotOpened)));
        }
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(|(index, path)| decode(path, index)),
        )
    }

    fn close(&mut self) {
        self.opened = false;
    }
}
