//! Depth-first block order.
//!
//! Both the structural hash and the profile encoder walk blocks in this
//! order. Keep it the single source of truth for either.

use super::function::BinaryFunction;

/// Block indices of `function` in depth-first order.
///
/// Starts from the entry points (block 0 first, then any additional entry
/// points in index order) and follows landing pads and successors. Blocks
/// unreachable from any entry point are not visited.
pub fn dfs(function: &BinaryFunction) -> Vec<usize> {
    let blocks = &function.blocks;
    let mut order = Vec::with_capacity(blocks.len());
    let mut visited = vec![false; blocks.len()];

    let mut stack: Vec<usize> = (0..blocks.len())
        .rev()
        .filter(|&index| function.is_entry_point(index))
        .collect();

    while let Some(index) = stack.pop() {
        if visited[index] {
            continue;
        }
        visited[index] = true;
        order.push(index);

        let block = &blocks[index];
        // Pushed in reverse so the first successor is visited first
        stack.extend(block.landing_pads.iter().rev());
        stack.extend(block.successors.iter().rev());
    }

    order
}
