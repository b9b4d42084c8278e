//! Output YAML schema definitions for profile data.
//!
//! This module defines the structure of the YAML documents we write to disk.
//! Field presence depends on the profile mode: fields a mode never fills in
//! are left out of the document instead of being written as zero.

use serde::{Serialize, Serializer};

/// Top-level profile structure written to YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryProfile {
    pub header: Header,

    /// Profiled functions in registry order
    pub functions: Vec<FunctionProfile>,
}

/// Profile-wide metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Format version for compatibility checking
    #[serde(rename = "profile-version")]
    pub version: u32,

    /// File name of the profiled binary
    #[serde(rename = "binary-name")]
    pub file_name: String,

    /// Build id, or `<unknown>`
    #[serde(rename = "binary-build-id")]
    pub id: String,

    /// Profile flags shared by every profiled function
    #[serde(rename = "profile-flags")]
    pub flags: u16,

    /// Name of the reader the profile came from
    #[serde(rename = "profile-origin")]
    pub origin: String,

    /// Comma-separated sampled event names
    #[serde(rename = "profile-events")]
    pub event_names: String,
}

/// Profile of one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionProfile {
    pub name: String,

    #[serde(rename = "fid")]
    pub id: u32,

    /// Structural hash used to match the profile against a function on reload
    #[serde(serialize_with = "serialize_hex")]
    pub hash: u64,

    #[serde(rename = "exec")]
    pub exec_count: u64,

    #[serde(rename = "nblocks")]
    pub num_basic_blocks: usize,

    /// Blocks in depth-first order
    pub blocks: Vec<BlockProfile>,
}

/// Profile of one basic block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockProfile {
    /// Index of the block within its function
    #[serde(rename = "bid")]
    pub index: usize,

    /// Non-pseudo instruction count
    #[serde(rename = "insns")]
    pub num_instructions: usize,

    /// Execution count (branch profiles only)
    #[serde(rename = "exec", skip_serializing_if = "Option::is_none")]
    pub exec_count: Option<u64>,

    /// Sampled event count (event-count profiles only)
    #[serde(rename = "events", skip_serializing_if = "Option::is_none")]
    pub event_count: Option<u64>,

    #[serde(rename = "calls", skip_serializing_if = "Vec::is_empty")]
    pub call_sites: Vec<CallSiteInfo>,

    #[serde(rename = "succ", skip_serializing_if = "Vec::is_empty")]
    pub successors: Vec<SuccessorInfo>,
}

/// A profiled call or indirect branch.
///
/// Ordered by offset, then destination, then entry discriminator. The
/// counters only break ties between otherwise identical sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CallSiteInfo {
    /// Offset of the instruction from the start of its block
    #[serde(rename = "off")]
    pub offset: u32,

    /// Destination function id, 0 when the target is unknown
    #[serde(rename = "fid")]
    pub dest_id: u32,

    /// Entry point of a multi-entry destination
    #[serde(rename = "disc", skip_serializing_if = "is_zero_u32")]
    pub entry_discriminator: u32,

    #[serde(rename = "cnt")]
    pub count: u64,

    #[serde(rename = "mis", skip_serializing_if = "is_zero_u64")]
    pub mispreds: u64,
}

/// Profile of one outgoing edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuccessorInfo {
    /// Index of the destination block
    #[serde(rename = "bid")]
    pub index: usize,

    #[serde(rename = "cnt")]
    pub count: u64,

    #[serde(rename = "mis", skip_serializing_if = "is_zero_u64")]
    pub mispreds: u64,
}

/// Totals over an encoded profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileSummary {
    pub functions: usize,
    pub blocks: usize,
    pub call_sites: usize,
    pub successors: usize,
}

impl BinaryProfile {
    /// Count the records in this profile
    pub fn summary(&self) -> ProfileSummary {
        let blocks = self.functions.iter().flat_map(|f| f.blocks.iter());

        blocks.fold(
            ProfileSummary {
                functions: self.functions.len(),
                ..Default::default()
            },
            |mut summary, block| {
                summary.blocks += 1;
                summary.call_sites += block.call_sites.len();
                summary.successors += block.successors.len();
                summary
            },
        )
    }
}

fn serialize_hex<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{:016X}", value))
}

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}
