pub mod frame_source;
pub mod hand_detector;
