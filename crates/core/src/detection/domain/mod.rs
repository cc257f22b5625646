pub mod detection_result;
pub mod face_detector;
pub mod face_landmarks;
pub mod heuristic_tuning;
pub mod skin_classifier;
pub mod smoothing_state;
