//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod encode;
pub mod utils;

// Re-export main command functions
pub use encode::{execute_encode, validate_args, EncodeArgs};
pub use utils::{display_schema, display_version};
