pub mod camera_device;
pub mod camera_session;
pub mod torch_controller;
pub mod zoom_controller;
