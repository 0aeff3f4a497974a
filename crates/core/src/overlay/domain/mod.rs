pub mod overlay_sink;
