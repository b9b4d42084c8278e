//! Encode one function.

use super::block::encode_block;
use super::schema::FunctionProfile;
use crate::binary::context::FunctionRegistry;
use crate::binary::function::{BinaryFunction, ProfileMode};
use crate::binary::source::ProfileSource;
use crate::binary::traversal::dfs;

/// Whether `function`'s profile should be written at all.
///
/// Functions without profile data never are. A profile that failed
/// validation is only written when the source is trusted.
pub fn is_eligible<S: ProfileSource>(function: &BinaryFunction, source: &S) -> bool {
    function.has_profile() && (function.has_valid_profile || source.is_trusted_source())
}

/// Encode `function`, visiting blocks in the same depth-first order the
/// structural hash uses
pub fn encode_function<R: FunctionRegistry>(function: &BinaryFunction, registry: &R) -> FunctionProfile {
    let mode = ProfileMode::from_flags(function.profile_flags);

    let blocks = dfs(function)
        .into_iter()
        .filter_map(|index| encode_block(function, index, mode, registry))
        .collect();

    FunctionProfile {
        name: function.name.clone(),
        id: function.id,
        hash: function.compute_hash(),
        exec_count: function.known_execution_count(),
        num_basic_blocks: function.blocks.len(),
        blocks,
    }
}
