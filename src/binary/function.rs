//! Functions of the in-memory binary model.

use super::block::BasicBlock;
use super::instruction::InstructionClass;
use super::traversal::dfs;
use crate::utils::error::ModelError;
use serde::Deserialize;
use sha2::{Digest, Sha256};

bitflags::bitflags! {
    /// Kind of profile attached to a function.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
    #[serde(transparent)]
    pub struct ProfileFlags: u16 {
        /// Branch records (taken/mispredicted edges and call sites)
        const LBR      = 1 << 0;
        /// Sampled basic-block events
        const SAMPLE   = 1 << 1;
        /// Memory events
        const MEMEVENT = 1 << 2;
    }
}

impl Default for ProfileFlags {
    fn default() -> Self {
        ProfileFlags::empty()
    }
}

/// How block counters must be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileMode {
    /// Branch-record profile: edge counts, call sites, execution counts
    SampledBranch,
    /// Event-count profile: one sampled event count per block
    EventCount,
}

impl ProfileMode {
    pub fn from_flags(flags: ProfileFlags) -> Self {
        if flags.contains(ProfileFlags::LBR) {
            ProfileMode::SampledBranch
        } else {
            ProfileMode::EventCount
        }
    }
}

/// A function of the binary being profiled
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BinaryFunction {
    /// Display name
    pub name: String,

    /// Function number, unique per binary
    pub id: u32,

    /// Start address; the registry iterates functions in address order
    pub address: u64,

    /// Entry symbols. The position of a symbol is its entry discriminator.
    /// When empty, `name` is the only (primary) entry symbol.
    #[serde(default)]
    pub symbols: Vec<String>,

    /// Entry execution count, `None` when no profile is attached
    #[serde(default)]
    pub execution_count: Option<u64>,

    #[serde(default)]
    pub profile_flags: ProfileFlags,

    /// Profile was matched against the function and found valid
    #[serde(default)]
    pub has_valid_profile: bool,

    #[serde(default)]
    pub blocks: Vec<BasicBlock>,
}

impl BinaryFunction {
    /// Create a function without profile data
    pub fn new(name: impl Into<String>, id: u32, address: u64, blocks: Vec<BasicBlock>) -> Self {
        Self {
            name: name.into(),
            id,
            address,
            symbols: Vec::new(),
            execution_count: None,
            profile_flags: ProfileFlags::empty(),
            has_valid_profile: false,
            blocks,
        }
    }

    /// Attach a validated profile
    pub fn with_profile(mut self, flags: ProfileFlags, execution_count: u64) -> Self {
        self.profile_flags = flags;
        self.execution_count = Some(execution_count);
        self.has_valid_profile = true;
        self
    }

    /// Replace the entry symbols
    pub fn with_symbols<S: Into<String>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_profile(&self) -> bool {
        self.execution_count.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Entry execution count, or 0 when no profile is attached
    pub fn known_execution_count(&self) -> u64 {
        self.execution_count.unwrap_or(0)
    }

    /// Block 0 is always an entry point; others are flagged explicitly
    pub fn is_entry_point(&self, index: usize) -> bool {
        index == 0 || self.blocks.get(index).is_some_and(|bb| bb.is_entry_point)
    }

    /// Symbols under which this function can be called
    pub fn entry_symbols(&self) -> Vec<&str> {
        if self.symbols.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.symbols.iter().map(String::as_str).collect()
        }
    }

    /// Order-sensitive hash of the function body in depth-first order
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = Sha256::new();

        for index in dfs(self) {
            for instr in self.blocks[index].instructions.iter().filter(|i| !i.is_pseudo()) {
                hasher.update(instr.opcode.as_bytes());
                for operand in &instr.operands {
                    hasher.update(b" ");
                    hasher.update(operand.as_bytes());
                }
                hasher.update(b"\n");
            }
            hasher.update(b"\x00");
        }

        let digest = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Check that every block reference stays inside the function and that
    /// edge profiles line up with successors.
    pub fn validate(&self) -> Result<(), ModelError> {
        let num_blocks = self.blocks.len();

        for (index, block) in self.blocks.iter().enumerate() {
            if block.successors.len() != block.branch_info.len() {
                return Err(ModelError::Invalid(format!(
                    "{}: block {} has {} successors but {} branch profiles",
                    self.name,
                    index,
                    block.successors.len(),
                    block.branch_info.len()
                )));
            }

            let targets = block.successors.iter().chain(block.landing_pads.iter());
            if let Some(bad) = targets.copied().find(|&target| target >= num_blocks) {
                return Err(ModelError::Invalid(format!(
                    "{}: block {} refers to block {} but the function has {} blocks",
                    self.name, index, bad, num_blocks
                )));
            }
        }

        Ok(())
    }
}
