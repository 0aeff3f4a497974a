pub mod constants;
pub mod detection_frame;
pub mod error;
pub mod hand;
