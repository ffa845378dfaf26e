//! Common utility functions.

pub mod data;

// Re-export commonly used items
pub use data::{load_json_file, load_yaml, load_yaml_file, save_json_file};
