use ndarray::Array3;

use crate::shared::frame::Frame;

/// Reusable downscaled RGB copy of a frame.
///
/// Reallocates only when the requested dimensions change, so a detector
/// running on a fixed-size camera stream allocates once.
pub struct SampleBuffer {
    pixels: Array3<u8>,
    allocations: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            pixels: Array3::zeros((0, 0, 3)),
            allocations: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().0 as u32
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Nearest-neighbour resample of `frame` into a `width x height` buffer.
    ///
    /// The frame must satisfy [`Frame::has_color_pixels`].
    pub fn resample(&mut self, frame: &Frame, width: u32, height: u32) {
        let (w, h) = (width as usize, height as usize);
        if self.pixels.dim() != (h, w, 3) {
            self.pixels = Array3::zeros((h, w, 3));
            self.allocations += 1;
        }

        let src = frame.as_ndarray();
        let (fw, fh) = (frame.width() as usize, frame.height() as usize);
        let col_map: Vec<usize> = (0..w).map(|x| source_index(x, w, fw)).collect();

        for y in 0..h {
            let sy = source_index(y, h, fh);
            for (x, &sx) in col_map.iter().enumerate() {
                for c in 0..3 {
                    self.pixels[[y, x, c]] = src[[sy, sx, c]];
                }
            }
        }
    }

    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let (x, y) = (x as usize, y as usize);
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
        ]
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a sample coordinate to the source pixel under its centre.
fn source_index(i: usize, sample_len: usize, source_len: usize) -> usize {
    let pos = (i as f64 + 0.5) * source_len as f64 / sample_len as f64;
    (pos as usize).min(source_len - 1)
}
