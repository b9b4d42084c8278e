//! Load a binary model dump from JSON.
//!
//! The dump carries everything the encoder reads from the outside world:
//! the functions with their attached profile, and the profile reader that
//! attached it.
//!
//! ```json
//! {
//!   "binary": { "file_name": "a.out", "build_id": null, "functions": [ ... ] },
//!   "source": { "name": "perf", "trusted": false, "event_names": ["cycles"] }
//! }
//! ```

use super::context::{BinaryContext, FunctionRegistry};
use super::function::BinaryFunction;
use super::source::ProfileReader;
use crate::profile::check_profile_consistency;
use crate::utils::error::ModelError;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ModelDump {
    binary: BinaryDump,
    source: ProfileReader,
}

#[derive(Debug, Deserialize)]
struct BinaryDump {
    file_name: String,
    #[serde(default)]
    build_id: Option<String>,
    #[serde(default)]
    functions: Vec<BinaryFunction>,
}

/// A loaded binary together with the reader of its profile
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub context: BinaryContext,
    pub source: ProfileReader,
}

/// Load a model dump from a JSON file
///
/// **Public** - main entry point for model loading
///
/// # Errors
/// * `ModelError::ReadFailed` - file cannot be opened
/// * `ModelError::JsonError` - malformed JSON or missing fields
/// * `ModelError::Invalid` - structurally inconsistent model, or profiled
///   functions that disagree on their profile flags
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel, ModelError> {
    let path = path.as_ref();

    info!("Loading binary model from: {}", path.display());

    let file = File::open(path).map_err(|source| ModelError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let dump: ModelDump = serde_json::from_reader(BufReader::new(file))?;
    from_dump(dump)
}

/// Parse a model dump held in memory
pub fn parse_model(json: &str) -> Result<LoadedModel, ModelError> {
    let dump: ModelDump = serde_json::from_str(json)?;
    from_dump(dump)
}

fn from_dump(dump: ModelDump) -> Result<LoadedModel, ModelError> {
    let BinaryDump {
        file_name,
        build_id,
        functions,
    } = dump.binary;

    debug!("Model for {} has {} functions", file_name, functions.len());

    let context = BinaryContext::new(file_name, build_id, functions)?;
    check_profile_consistency(context.functions())
        .map_err(|err| ModelError::Invalid(err.to_string()))?;

    Ok(LoadedModel {
        context,
        source: dump.source,
    })
}
