use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::image_writer::ImageWriter;

/// Sink that saves frame `i` to `outputs[i]`.
pub struct ImageSequenceWriter {
    writer: Box<dyn ImageWriter>,
    outputs: Vec<PathBuf>,
    written: usize,
}

impl ImageSequenceWriter {
    pub fn new(writer: Box<dyn ImageWriter>, outputs: Vec<PathBuf>) -> Self {
        Self {
            writer,
            outputs,
            written: 0,
        }
    }

    /// One output per input, same file name, placed in `output_dir`.
    pub fn into_dir(writer: Box<dyn ImageWriter>, inputs: &[PathBuf], output_dir: &Path) -> Self {
        let outputs = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| match input.file_name() {
                Some(name) => output_dir.join(name),
                None => output_dir.join(format!("frame_{i:05}.png")),
            })
            .collect();
        Self::new(writer, outputs)
    }

    pub fn outputs(&self) -> &[PathBuf] {
        &self.outputs
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for ImageSequenceWriter {
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let path = self
            .outputs
            .get(frame.index())
            .ok_or_else(|| format!("No output path for frame {}", frame.index()))?;
        self.writer.write(path, frame)?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Wrote {} of {} images", self.written, self.outputs.len());
        Ok(())
    }
}
