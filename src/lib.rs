//! binprof
//!
//! Deterministic YAML encoding of basic-block execution profiles.
//!
//! Takes a binary model whose functions carry an attached profile (branch
//! records or sampled event counts) and writes a sorted, reproducible YAML
//! document an optimizer can reload later.
//!
//! ## Getting Started
//!
//! ```bash
//! binprof encode --model model.json --output profile.yaml
//! ```
//!
//! From Rust, build a [`binary::BinaryContext`] and call
//! [`output::write_profile`], or [`profile::build_profile`] to get the
//! record tree in memory.

pub mod binary;
pub mod commands;
pub mod output;
pub mod profile;
pub mod utils;
