/// Hardware zoom range reported by a capture track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomCapability {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Zoom currently applied by the device.
    pub current: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraCapabilities {
    pub zoom: Option<ZoomCapability>,
    pub torch: bool,
}

pub type DeviceError = Box<dyn std::error::Error + Send + Sync>;

/// A video input reported by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoInput {
    pub device_id: String,
    pub label: String,
}

impl VideoInput {
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }
}

/// An open capture device whose constraints can be changed while streaming.
pub trait CameraDevice: Send {
    fn capabilities(&self) -> CameraCapabilities;

    fn apply_zoom(&mut self, zoom: f64) -> Result<(), DeviceError>;

    fn apply_torch(&mut self, on: bool) -> Result<(), DeviceError>;

    /// Stops every track of the stream. The device is dropped afterwards.
    fn stop(&mut self);
}

/// The host's media layer: lists video inputs and opens streams on them.
pub trait CameraProvider: Send {
    /// Video inputs only, in the host's order.
    fn enumerate_devices(&mut self) -> Result<Vec<VideoInput>, DeviceError>;

    /// Opens a stream on `device_id`, or on the preferred rear-facing
    /// camera when `None`.
    fn start_stream(&mut self, device_id: Option<&str>)
        -> Result<Box<dyn CameraDevice>, DeviceError>;
}
