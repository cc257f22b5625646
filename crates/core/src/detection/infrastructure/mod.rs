pub mod cooldown_detector;
pub mod detector_factory;
pub mod heuristic_face_detector;
pub mod sample_buffer;
