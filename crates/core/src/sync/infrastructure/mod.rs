pub mod in_memory_model;
pub mod json_lines_model;
