use super::camera_device::CameraDevice;

/// Desired torch (flash) state of the active capture device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TorchController {
    on: bool,
}

impl TorchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Flips the desired state and applies it. Returns whether the device
    /// accepted the new state.
    pub fn toggle(&mut self, device: &mut dyn CameraDevice) -> bool {
        self.on = !self.on;
        self.apply(device)
    }

    /// Applies the desired state; devices without a torch are never called.
    pub fn apply(&self, device: &mut dyn CameraDevice) -> bool {
        if !device.capabilities().torch {
            return false;
        }
        match device.apply_torch(self.on) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Setting torch failed: {e}");
                false
            }
        }
    }
}
