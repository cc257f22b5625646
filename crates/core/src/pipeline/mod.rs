pub mod detect_faces_use_case;
pub mod frame_pump;
pub mod infrastructure;
pub mod render_effects_use_case;
