pub mod log_overlay;
