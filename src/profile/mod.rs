//! Profile encoding engine.
//!
//! Turns the profile attached to a binary model into a [`BinaryProfile`]
//! tree:
//! - Consistency check and header (`header`)
//! - Per-function encoding in depth-first block order (`function`)
//! - Per-block omission rules and edge profiles (`block`)
//! - Call-site extraction (`callsite`)

pub mod block;
pub mod callsite;
pub mod function;
pub mod header;
pub mod schema;

pub use block::encode_block;
pub use callsite::extract_call_sites;
pub use function::{encode_function, is_eligible};
pub use header::{build_header, check_profile_consistency};
pub use schema::{
    BinaryProfile, BlockProfile, CallSiteInfo, FunctionProfile, Header, ProfileSummary, SuccessorInfo,
};

use crate::binary::context::FunctionRegistry;
use crate::binary::source::ProfileSource;
use log::debug;

/// Encode every eligible function of `registry`
///
/// **Public** - main entry point of the encoder
///
/// # Panics
/// If profiled functions disagree on their profile flags. That means the
/// stage that attached the profile is broken, and no output is better than
/// a mixed-mode profile.
pub fn build_profile<R, S>(registry: &R, source: &S) -> BinaryProfile
where
    R: FunctionRegistry,
    S: ProfileSource,
{
    let flags = match check_profile_consistency(registry.functions()) {
        Ok(flags) => flags,
        Err(err) => panic!("{err}"),
    };

    let header = build_header(registry, source, flags);

    let mut functions = Vec::new();
    for function in registry.functions() {
        if !function.has_profile() {
            continue;
        }
        if !is_eligible(function, source) {
            debug!("Skipping {}: profile is not validated", function.name);
            continue;
        }
        functions.push(encode_function(function, registry));
    }

    debug!("Encoded {} functions with flags {:?}", functions.len(), flags);

    BinaryProfile { header, functions }
}
