//! Extract call-site records from a single instruction.
//!
//! Direct calls and tail calls produce at most one record and only when
//! they were observed. Indirect calls and branches produce one record per
//! entry of their target profile, whatever its count.

use super::schema::CallSiteInfo;
use crate::binary::context::FunctionRegistry;
use crate::binary::instruction::InstructionClass;
use crate::utils::config::UNKNOWN_FUNCTION_ID;
use log::trace;

/// Call-site records of `instr`, unordered
///
/// # Arguments
/// * `instr` - Instruction to inspect
/// * `block_offset` - Input offset of the block holding `instr`
/// * `registry` - Resolves target symbols to function ids
///
/// # Returns
/// Zero or more records. Instructions that are neither calls nor indirect
/// branches, that lack a usable offset, or that are indirect without a
/// target profile produce nothing.
pub fn extract_call_sites<I, R>(instr: &I, block_offset: u32, registry: &R) -> Vec<CallSiteInfo>
where
    I: InstructionClass,
    R: FunctionRegistry,
{
    if !instr.is_call() && !instr.is_indirect_branch() {
        return Vec::new();
    }

    let annotations = instr.annotations();
    let offset = match annotations.offset {
        Some(offset) if offset >= block_offset => offset - block_offset,
        _ => {
            trace!("Skipping call site without a valid offset in block at {:#x}", block_offset);
            return Vec::new();
        }
    };

    if instr.is_indirect_call() || instr.is_indirect_branch() {
        let Some(profile) = &annotations.call_profile else {
            return Vec::new();
        };

        return profile
            .iter()
            .map(|target| {
                let dest_id = target
                    .symbol
                    .as_deref()
                    .and_then(|symbol| registry.function_for_symbol(symbol))
                    .map_or(UNKNOWN_FUNCTION_ID, |(callee, _)| callee.id);

                CallSiteInfo {
                    offset,
                    dest_id,
                    entry_discriminator: 0,
                    count: target.count,
                    mispreds: target.mispreds,
                }
            })
            .collect();
    }

    // Direct call or tail call
    let (dest_id, entry_discriminator) = instr
        .target_symbol()
        .and_then(|symbol| registry.function_for_symbol(symbol))
        .map_or((UNKNOWN_FUNCTION_ID, 0), |(callee, entry)| (callee.id, entry));

    let (count, mispreds) = if instr.has_conditional_tail_call() {
        match annotations.ctc_taken_count {
            Some(taken) => (taken, annotations.ctc_mispred_count.unwrap_or(0)),
            None => (0, 0),
        }
    } else {
        (annotations.count.unwrap_or(0), 0)
    };

    if count == 0 {
        return Vec::new();
    }

    vec![CallSiteInfo {
        offset,
        dest_id,
        entry_discriminator,
        count,
        mispreds,
    }]
}
