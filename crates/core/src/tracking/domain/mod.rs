pub mod columnar_hand;
pub mod debug_summary;
pub mod handedness;
pub mod precision;
pub mod tracking_state;
