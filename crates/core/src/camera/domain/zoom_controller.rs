use super::camera_device::{CameraCapabilities, CameraDevice, ZoomCapability};

pub const SOFTWARE_MIN_ZOOM: f64 = 0.25;
pub const SOFTWARE_MAX_ZOOM: f64 = 10.0;
pub const SOFTWARE_ZOOM_STEP: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomMode {
    /// Zoom is applied as a device constraint.
    Hardware,
    /// Zoom is applied by scaling the rendered output.
    Software,
}

/// Zoom level bookkeeping for one capture stream.
///
/// Uses the device's own range when it reports one, and a scaled preview
/// otherwise. A rejected hardware zoom drops to software zoom for the rest
/// of the stream.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomController {
    zoom: f64,
    min: f64,
    max: f64,
    step: f64,
    mode: ZoomMode,
}

impl ZoomController {
    /// Hardware zoom when the device reports a usable range, software zoom
    /// otherwise. An inverted range is swapped; a non-finite bound falls
    /// back to software zoom.
    pub fn from_capabilities(capabilities: &CameraCapabilities) -> Self {
        capabilities
            .zoom
            .and_then(Self::hardware)
            .unwrap_or_else(Self::software)
    }

    fn hardware(hw: ZoomCapability) -> Option<Self> {
        if !hw.min.is_finite() || !hw.max.is_finite() {
            log::warn!(
                "Ignoring hardware zoom range [{}, {}], using software zoom",
                hw.min,
                hw.max
            );
            return None;
        }
        let (min, max) = if hw.min <= hw.max {
            (hw.min, hw.max)
        } else {
            (hw.max, hw.min)
        };
        let step = if hw.step.is_finite() && hw.step > 0.0 {
            hw.step
        } else {
            SOFTWARE_ZOOM_STEP
        };
        let current = if hw.current.is_finite() { hw.current } else { 1.0 };
        Some(Self {
            zoom: current.max(min).min(max),
            min,
            max,
            step,
            mode: ZoomMode::Hardware,
        })
    }

    pub fn software() -> Self {
        Self {
            zoom: 1.0,
            min: SOFTWARE_MIN_ZOOM,
            max: SOFTWARE_MAX_ZOOM,
            step: SOFTWARE_ZOOM_STEP,
            mode: ZoomMode::Software,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn mode(&self) -> ZoomMode {
        self.mode
    }

    /// Output scale factor to apply when zooming in software, `None` when
    /// the device zooms itself.
    pub fn software_scale(&self) -> Option<f64> {
        match self.mode {
            ZoomMode::Software => Some(self.zoom),
            ZoomMode::Hardware => None,
        }
    }

    /// Changes the zoom by `delta`, clamped to the range and rounded to two
    /// decimals, then applies it. Returns the new zoom.
    pub fn adjust(&mut self, delta: f64, device: &mut dyn CameraDevice) -> f64 {
        if !delta.is_finite() {
            return self.zoom;
        }
        let target = (self.zoom + delta).clamp(self.min, self.max);
        self.zoom = (target * 100.0).round() / 100.0;
        self.apply(device);
        self.zoom
    }

    pub fn zoom_in(&mut self, device: &mut dyn CameraDevice) -> f64 {
        self.adjust(self.step, device)
    }

    pub fn zoom_out(&mut self, device: &mut dyn CameraDevice) -> f64 {
        self.adjust(-self.step, device)
    }

    /// Pushes the current zoom to the device in hardware mode.
    pub fn apply(&mut self, device: &mut dyn CameraDevice) {
        if self.mode != ZoomMode::Hardware {
            return;
        }
        if let Err(e) = device.apply_zoom(self.zoom) {
            log::warn!("Hardware zoom failed, using software zoom: {e}");
            self.mode = ZoomMode::Software;
        }
    }

    pub fn can_zoom_in(&self) -> bool {
        self.zoom < self.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.zoom > self.min
    }

    /// Zoom as a whole percentage, e.g. `150` for 1.5x.
    pub fn percentage(&self) -> i64 {
        (self.zoom * 100.0).round() as i64
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::software()
    }
}
