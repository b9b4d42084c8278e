//! Basic blocks of the in-memory binary model.

use super::instruction::{Instruction, InstructionClass};
use serde::Deserialize;

/// Profile of one outgoing edge, parallel to the block's successor list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BranchInfo {
    /// Times the edge was taken
    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub mispredicted_count: u64,
}

/// A basic block.
///
/// Successors and landing pads are referenced by their index in the owning
/// function's block list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BasicBlock {
    /// Offset of the first instruction in the input binary
    #[serde(default)]
    pub input_offset: u32,

    #[serde(default)]
    pub instructions: Vec<Instruction>,

    /// Known execution count, `None` if the block carries no profile
    #[serde(default)]
    pub execution_count: Option<u64>,

    #[serde(default)]
    pub is_entry_point: bool,

    #[serde(default)]
    pub is_landing_pad: bool,

    #[serde(default)]
    pub successors: Vec<usize>,

    #[serde(default)]
    pub branch_info: Vec<BranchInfo>,

    #[serde(default)]
    pub landing_pads: Vec<usize>,
}

impl BasicBlock {
    /// Create a block at `input_offset` holding `instructions`
    pub fn new(input_offset: u32, instructions: Vec<Instruction>) -> Self {
        Self {
            input_offset,
            instructions,
            ..Default::default()
        }
    }

    pub fn with_execution_count(mut self, count: u64) -> Self {
        self.execution_count = Some(count);
        self
    }

    /// Mark as an additional entry point
    pub fn entry_point(mut self) -> Self {
        self.is_entry_point = true;
        self
    }

    pub fn landing_pad(mut self) -> Self {
        self.is_landing_pad = true;
        self
    }

    /// Append an outgoing edge together with its branch profile
    pub fn with_successor(mut self, index: usize, count: u64, mispreds: u64) -> Self {
        self.successors.push(index);
        self.branch_info.push(BranchInfo {
            count,
            mispredicted_count: mispreds,
        });
        self
    }

    /// Add an exception edge to a landing pad
    pub fn with_landing_pad(mut self, index: usize) -> Self {
        self.landing_pads.push(index);
        self
    }

    /// Execution count, or 0 when the block has no profile
    pub fn known_execution_count(&self) -> u64 {
        self.execution_count.unwrap_or(0)
    }

    /// Number of instructions that have an encoding
    pub fn num_non_pseudos(&self) -> usize {
        self.instructions.iter().filter(|i| !i.is_pseudo()).count()
    }

    /// Outgoing edges paired with their branch profile.
    ///
    /// # Panics
    /// If the successor and branch-info lists differ in length. Model
    /// loading rejects such blocks, so this only fires on models built
    /// directly in code.
    pub fn successor_edges(&self) -> impl Iterator<Item = (usize, &BranchInfo)> + '_ {
        assert_eq!(
            self.successors.len(),
            self.branch_info.len(),
            "successor and branch info lists must be parallel"
        );
        self.successors.iter().copied().zip(self.branch_info.iter())
    }

    /// Sum of all outgoing edge counts, saturating at `u64::MAX`
    pub fn successor_exec_count(&self) -> u64 {
        self.branch_info
            .iter()
            .fold(0u64, |total, bi| total.saturating_add(bi.count))
    }
}
