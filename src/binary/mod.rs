//! The in-memory model of a profiled binary.
//!
//! This module covers everything the encoder consumes but does not own:
//! - Instructions and their profile annotations
//! - Basic blocks with edge profiles
//! - Functions, profile flags and the shared depth-first traversal
//! - The function registry and the profile source
//! - Loading a model dump from JSON

pub mod block;
pub mod context;
pub mod function;
pub mod instruction;
pub mod loader;
pub mod source;
pub mod traversal;

// Re-export main types
pub use block::{BasicBlock, BranchInfo};
pub use context::{BinaryContext, FunctionRegistry};
pub use function::{BinaryFunction, ProfileFlags, ProfileMode};
pub use instruction::{Annotations, IndirectCallProfile, Instruction, InstructionClass, InstructionKind};
pub use loader::{load_model, parse_model, LoadedModel};
pub use source::{ProfileReader, ProfileSource};
pub use traversal::dfs;
