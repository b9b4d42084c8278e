//! Encode command implementation.
//!
//! The encode command:
//! 1. Loads the binary model dump
//! 2. Encodes the attached profile
//! 3. Writes the YAML profile

use crate::binary::load_model;
use crate::output::{validate_path, write_profile};
use crate::profile::ProfileSummary;
use crate::utils::config::DEFAULT_OUTPUT_FILE;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the encode command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct EncodeArgs {
    /// JSON dump of the binary model with its attached profile
    pub model_path: PathBuf,

    /// Output path for the YAML profile
    pub output_path: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for EncodeArgs {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            print_summary: false,
        }
    }
}

/// Execute the encode command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Model file missing or invalid
/// * Output file cannot be created or written
pub fn execute_encode(args: &EncodeArgs) -> Result<ProfileSummary> {
    let start_time = Instant::now();

    info!("Step 1/2: Loading binary model...");
    let model = load_model(&args.model_path)
        .with_context(|| format!("Failed to load model {}", args.model_path.display()))?;

    info!("Step 2/2: Encoding and writing profile...");
    let summary = write_profile(&model.context, &model.source, &args.output_path)
        .context("Failed to write profile")?;

    info!("✓ Profile written to: {}", args.output_path.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(60));
        println!("PROFILE SUMMARY");
        println!("{}", "=".repeat(60));
        println!("Binary:      {}", args.model_path.display());
        println!("Functions:   {}", summary.functions);
        println!("Blocks:      {}", summary.blocks);
        println!("Call sites:  {}", summary.call_sites);
        println!("Successors:  {}", summary.successors);
        println!("{}", "=".repeat(60));
    }

    info!("Encode completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(summary)
}

/// Validate encode arguments
///
/// **Public** - can be called before execute_encode for early validation
pub fn validate_args(args: &EncodeArgs) -> Result<()> {
    if args.model_path.as_os_str().is_empty() {
        anyhow::bail!("Model path cannot be empty");
    }

    if args.model_path == args.output_path {
        anyhow::bail!("Output path must differ from the model path");
    }

    validate_path(&args.output_path).context("Invalid output path")?;

    Ok(())
}
