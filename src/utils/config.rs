//! Configuration and constants for the profile encoder.

/// Current output format version, written to `header.profile-version`
pub const PROFILE_VERSION: u32 = 1;

/// Build id written when the binary carries none
pub const UNKNOWN_BUILD_ID: &str = "<unknown>";

/// Destination id for call targets that do not resolve to a known function
pub const UNKNOWN_FUNCTION_ID: u32 = 0;

// Event names are joined into a single header string
pub const EVENT_NAME_SEPARATOR: &str = ",";

/// Default output path for the `encode` command
pub const DEFAULT_OUTPUT_FILE: &str = "profile.yaml";
