use super::camera_device::{CameraDevice, CameraProvider, DeviceError, VideoInput};
use super::torch_controller::TorchController;
use super::zoom_controller::ZoomController;

/// The active capture stream and the controls that follow it across
/// device switches.
///
/// Starting a stream stops the previous one, refreshes the device list,
/// rebuilds zoom from the new device's capabilities and re-applies the
/// desired torch state.
pub struct CameraSession {
    provider: Box<dyn CameraProvider>,
    devices: Vec<VideoInput>,
    current_index: usize,
    stream: Option<Box<dyn CameraDevice>>,
    zoom: ZoomController,
    torch: TorchController,
}

impl CameraSession {
    pub fn new(provider: Box<dyn CameraProvider>) -> Self {
        Self {
            provider,
            devices: Vec::new(),
            current_index: 0,
            stream: None,
            zoom: ZoomController::software(),
            torch: TorchController::new(),
        }
    }

    /// Lists the devices and opens the preferred camera.
    pub fn start(&mut self) -> Result<(), DeviceError> {
        self.enumerate_devices();
        self.start_stream(None)
    }

    /// Refreshes the device list. A host that refuses enumeration yields
    /// an empty list.
    pub fn enumerate_devices(&mut self) -> &[VideoInput] {
        self.devices = match self.provider.enumerate_devices() {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("Could not enumerate cameras: {e}");
                Vec::new()
            }
        };
        &self.devices
    }

    pub fn devices(&self) -> &[VideoInput] {
        &self.devices
    }

    /// Advances to the next device, wrapping around. `None` when no
    /// devices are known.
    pub fn next_device_id(&mut self) -> Option<String> {
        if self.devices.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.devices.len();
        Some(self.devices[self.current_index].device_id.clone())
    }

    pub fn start_stream(&mut self, device_id: Option<&str>) -> Result<(), DeviceError> {
        self.stop();

        let mut stream = self.provider.start_stream(device_id)?;
        self.enumerate_devices();

        self.zoom = ZoomController::from_capabilities(&stream.capabilities());
        self.zoom.apply(&mut *stream);
        self.torch.apply(&mut *stream);
        log::info!(
            "Camera stream started on {} ({:?} zoom)",
            device_id.unwrap_or("default device"),
            self.zoom.mode()
        );

        self.stream = Some(stream);
        Ok(())
    }

    /// Opens the next device in the list, or the preferred camera when no
    /// devices are known.
    pub fn switch_camera(&mut self) -> Result<(), DeviceError> {
        let next = self.next_device_id();
        self.start_stream(next.as_deref()).map_err(|e| {
            log::error!("Switching camera failed: {e}");
            e
        })
    }

    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn torch(&self) -> &TorchController {
        &self.torch
    }

    /// `None` without an active stream.
    pub fn zoom_in(&mut self) -> Option<f64> {
        let stream = self.stream.as_deref_mut()?;
        Some(self.zoom.zoom_in(stream))
    }

    pub fn zoom_out(&mut self) -> Option<f64> {
        let stream = self.stream.as_deref_mut()?;
        Some(self.zoom.zoom_out(stream))
    }

    /// Returns whether the device accepted the new torch state.
    pub fn toggle_torch(&mut self) -> bool {
        match self.stream.as_deref_mut() {
            Some(stream) => self.torch.toggle(stream),
            None => false,
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}
