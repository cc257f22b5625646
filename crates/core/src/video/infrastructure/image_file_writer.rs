use std::path::Path;

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes a single frame to an image file using the `image` crate.
///
/// RGB and RGBA frames are supported; the format follows the extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = frame.data().to_vec();
        match frame.channels() {
            3 => image::RgbImage::from_raw(frame.width(), frame.height(), data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            4 => image::RgbaImage::from_raw(frame.width(), frame.height(), data)
                .ok_or("Failed to create image from frame data")?
                .save(path)?,
            n => return Err(format!("Unsupported channel count {n}").into()),
        }
        Ok(())
    }
}
