pub mod threaded_frame_pump;
