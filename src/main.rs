//! binprof CLI
//!
//! Encodes the profile attached to a binary model into a YAML profile.

use anyhow::Result;
use binprof::commands::{display_schema, display_version, execute_encode, validate_args, EncodeArgs};
use binprof::utils::config::DEFAULT_OUTPUT_FILE;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// binprof - YAML encoding of basic-block execution profiles
#[derive(Parser, Debug)]
#[command(name = "binprof")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode the profile of a binary model dump
    Encode {
        /// JSON dump of the binary model and its profile
        #[arg(short, long, env = "BINPROF_MODEL")]
        model: PathBuf,

        /// Output path for the YAML profile
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Display format information
    Schema {
        /// Show full format details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Encode {
            model,
            output,
            summary,
        } => {
            let args = EncodeArgs {
                model_path: model,
                output_path: output,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_encode(&args)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
