//! Output writers for profile data.
//!
//! This module handles writing encoded profiles to disk as YAML.

pub mod yaml;

// Re-export main functions
pub use yaml::{profile_to_string, validate_path, write_profile};
