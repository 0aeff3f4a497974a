pub mod recorded_hand_detector;
pub mod recording_reader;
pub mod replay_frame_source;
