//! Encode one basic block.

use super::callsite::extract_call_sites;
use super::schema::{BlockProfile, SuccessorInfo};
use crate::binary::context::FunctionRegistry;
use crate::binary::function::{BinaryFunction, ProfileMode};

/// Encode block `index` of `function`
///
/// **Public** - called by the function encoder for every block in
/// depth-first order
///
/// # Returns
/// `None` when the block carries nothing worth writing:
/// * event-count mode: the event count is zero
/// * branch mode: no call sites, not an entry point, not an executed
///   landing pad, and no outgoing edge was taken
pub fn encode_block<R: FunctionRegistry>(
    function: &BinaryFunction,
    index: usize,
    mode: ProfileMode,
    registry: &R,
) -> Option<BlockProfile> {
    let block = &function.blocks[index];
    let exec_count = block.known_execution_count();

    let mut profile = BlockProfile {
        index,
        num_instructions: block.num_non_pseudos(),
        ..Default::default()
    };

    if mode == ProfileMode::EventCount {
        if exec_count == 0 {
            return None;
        }
        profile.event_count = Some(exec_count);
        return Some(profile);
    }

    profile.exec_count = Some(exec_count);

    profile.call_sites = block
        .instructions
        .iter()
        .flat_map(|instr| extract_call_sites(instr, block.input_offset, registry))
        .collect();
    profile.call_sites.sort();

    let keep = !profile.call_sites.is_empty()
        || function.is_entry_point(index)
        || (block.is_landing_pad && exec_count != 0)
        || block.successor_exec_count() != 0;
    if !keep {
        return None;
    }

    profile.successors = block
        .successor_edges()
        .map(|(successor, branch)| SuccessorInfo {
            index: successor,
            count: branch.count,
            mispreds: branch.mispredicted_count,
        })
        .collect();

    Some(profile)
}
