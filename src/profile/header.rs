//! Cross-function consistency check and header construction.

use super::schema::Header;
use crate::binary::context::FunctionRegistry;
use crate::binary::function::{BinaryFunction, ProfileFlags};
use crate::binary::source::ProfileSource;
use crate::utils::config::{EVENT_NAME_SEPARATOR, PROFILE_VERSION, UNKNOWN_BUILD_ID};
use crate::utils::error::ConsistencyError;

/// Check that every profiled, non-empty function carries the same profile
/// flags.
///
/// # Returns
/// The shared flags, or the empty set when no function has a profile
///
/// # Errors
/// * `ConsistencyError::MissingFlags` - a profiled function has no flags
/// * `ConsistencyError::Mismatch` - two functions disagree
pub fn check_profile_consistency<'a>(
    functions: impl IntoIterator<Item = &'a BinaryFunction>,
) -> Result<ProfileFlags, ConsistencyError> {
    let mut expected: Option<ProfileFlags> = None;

    for function in functions {
        if !function.has_profile() || function.is_empty() {
            continue;
        }

        let found = function.profile_flags;
        if found.is_empty() {
            return Err(ConsistencyError::MissingFlags {
                function: function.name.clone(),
            });
        }

        match expected {
            None => expected = Some(found),
            Some(flags) if flags == found => {}
            Some(flags) => {
                return Err(ConsistencyError::Mismatch {
                    function: function.name.clone(),
                    expected: flags,
                    found,
                })
            }
        }
    }

    Ok(expected.unwrap_or_default())
}

/// Build the profile header
pub fn build_header<R, S>(registry: &R, source: &S, flags: ProfileFlags) -> Header
where
    R: FunctionRegistry,
    S: ProfileSource,
{
    Header {
        version: PROFILE_VERSION,
        file_name: registry.file_name().to_string(),
        id: registry.build_id().unwrap_or(UNKNOWN_BUILD_ID).to_string(),
        flags: flags.bits(),
        origin: source.name().to_string(),
        event_names: source.event_names().join(EVENT_NAME_SEPARATOR),
    }
}
