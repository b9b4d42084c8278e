//! Instructions and the per-instruction profile annotations.
//!
//! The encoder never inspects opcodes itself. It asks the instruction what
//! it is through [`InstructionClass`] and reads counters from its
//! [`Annotations`].

use serde::Deserialize;

/// One `(target, count, mispredicts)` entry of an indirect call profile
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndirectCallProfile {
    /// Target symbol, `None` when the sampled target was outside any symbol
    #[serde(default)]
    pub symbol: Option<String>,

    /// Times this target was observed
    #[serde(default)]
    pub count: u64,

    /// Mispredicted transfers to this target
    #[serde(default)]
    pub mispreds: u64,
}

impl IndirectCallProfile {
    pub fn new(symbol: Option<&str>, count: u64, mispreds: u64) -> Self {
        Self {
            symbol: symbol.map(str::to_string),
            count,
            mispreds,
        }
    }
}

/// Profile annotations attached to an instruction.
///
/// Every field is optional: a missing annotation and an annotation holding
/// zero are different things to the call-site rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Annotations {
    /// Offset of the instruction in the input binary
    pub offset: Option<u32>,

    /// Per-target profile of an indirect call or branch
    pub call_profile: Option<Vec<IndirectCallProfile>>,

    /// Execution count of a direct call
    pub count: Option<u64>,

    /// Taken count of a conditional tail call
    pub ctc_taken_count: Option<u64>,

    /// Mispredicted count of a conditional tail call
    pub ctc_mispred_count: Option<u64>,
}

/// Capability queries the encoder needs from an instruction
pub trait InstructionClass {
    /// Any call, including direct, indirect and tail calls
    fn is_call(&self) -> bool;

    /// Indirect jump that is not a call (jump tables, computed gotos)
    fn is_indirect_branch(&self) -> bool;

    fn is_indirect_call(&self) -> bool;

    /// Tail call guarded by a condition
    fn has_conditional_tail_call(&self) -> bool;

    /// Instructions with no machine encoding (labels, CFI, ...)
    fn is_pseudo(&self) -> bool;

    /// Symbol of a direct call or tail call target
    fn target_symbol(&self) -> Option<&str>;

    fn annotations(&self) -> &Annotations;
}

/// Control-flow classification of an instruction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionKind {
    #[default]
    Other,
    Pseudo,
    Call,
    IndirectCall,
    IndirectBranch,
    TailCall,
    IndirectTailCall,
    ConditionalTailCall,
}

/// A machine instruction of the in-memory binary model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Instruction {
    /// Mnemonic, e.g. `callq`
    pub opcode: String,

    /// Printed operands, hashed together with the opcode
    #[serde(default)]
    pub operands: Vec<String>,

    #[serde(default)]
    pub kind: InstructionKind,

    /// Static target symbol for direct calls and tail calls
    #[serde(default)]
    pub target: Option<String>,

    #[serde(default)]
    pub annotations: Annotations,
}

impl Instruction {
    /// Create an instruction with no operands and no annotations
    pub fn new(opcode: impl Into<String>, kind: InstructionKind) -> Self {
        Self {
            opcode: opcode.into(),
            operands: Vec::new(),
            kind,
            target: None,
            annotations: Annotations::default(),
        }
    }

    pub fn with_operands<S: Into<String>>(mut self, operands: impl IntoIterator<Item = S>) -> Self {
        self.operands = operands.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.annotations.offset = Some(offset);
        self
    }

    /// Set the static call target
    pub fn with_target(mut self, symbol: impl Into<String>) -> Self {
        self.target = Some(symbol.into());
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.annotations.count = Some(count);
        self
    }

    pub fn with_call_profile(mut self, profile: Vec<IndirectCallProfile>) -> Self {
        self.annotations.call_profile = Some(profile);
        self
    }

    /// Set conditional tail call counters
    pub fn with_ctc_counts(mut self, taken: u64, mispreds: Option<u64>) -> Self {
        self.annotations.ctc_taken_count = Some(taken);
        self.annotations.ctc_mispred_count = mispreds;
        self
    }
}

impl InstructionClass for Instruction {
    fn is_call(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::Call
                | InstructionKind::IndirectCall
                | InstructionKind::TailCall
                | InstructionKind::IndirectTailCall
                | InstructionKind::ConditionalTailCall
        )
    }

    fn is_indirect_branch(&self) -> bool {
        self.kind == InstructionKind::IndirectBranch
    }

    fn is_indirect_call(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::IndirectCall | InstructionKind::IndirectTailCall
        )
    }

    fn has_conditional_tail_call(&self) -> bool {
        self.kind == InstructionKind::ConditionalTailCall
    }

    fn is_pseudo(&self) -> bool {
        self.kind == InstructionKind::Pseudo
    }

    fn target_symbol(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
