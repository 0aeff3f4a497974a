pub mod config_snapshot;
pub mod lifecycle_controller;
pub mod pipeline_logger;
pub mod process_frame_use_case;
