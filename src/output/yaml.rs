//! YAML profile output writer.
//!
//! Encodes the profile, then opens the destination and serializes it. The
//! destination is left untouched unless encoding succeeds.

use crate::binary::context::FunctionRegistry;
use crate::binary::source::ProfileSource;
use crate::profile::{build_profile, BinaryProfile, ProfileSummary};
use crate::utils::error::OutputError;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode the profile of `registry` and write it to a YAML file
///
/// **Public** - main entry point for profile output
///
/// # Arguments
/// * `registry` - Functions of the profiled binary
/// * `source` - Reader that attached the profile
/// * `output_path` - Destination file, created or truncated
///
/// # Returns
/// Record counts of the written profile
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty or a directory
/// * `OutputError::OpenFailed` - Destination cannot be created; nothing is written
/// * `OutputError::SerializationFailed` - YAML serialization error
/// * `OutputError::WriteFailed` - I/O error during write
///
/// # Panics
/// If profiled functions disagree on their profile flags. The panic happens
/// before the destination is opened, so an existing file keeps its content.
pub fn write_profile<R, S>(
    registry: &R,
    source: &S,
    output_path: impl AsRef<Path>,
) -> Result<ProfileSummary, OutputError>
where
    R: FunctionRegistry,
    S: ProfileSource,
{
    let output_path = output_path.as_ref();

    info!("Writing profile to: {}", output_path.display());

    validate_path(output_path)?;

    let profile = build_profile(registry, source);
    let summary = profile.summary();

    let file = File::create(output_path).map_err(|err| {
        warn!("{} : unable to open {} for output", err, output_path.display());
        OutputError::OpenFailed {
            path: output_path.to_path_buf(),
            source: err,
        }
    })?;

    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, &profile)?;
    writer.flush()?;

    info!(
        "Profile written successfully ({} functions, {} blocks)",
        summary.functions, summary.blocks
    );

    Ok(summary)
}

/// Serialize an encoded profile to a YAML string
pub fn profile_to_string(profile: &BinaryProfile) -> Result<String, OutputError> {
    Ok(serde_yaml::to_string(profile)?)
}

/// Validate that output path is writable
///
/// **Public** - lets callers fail early, before loading a model
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if path.extension().is_some_and(|ext| ext != "yaml" && ext != "yml") {
        debug!("Output file does not have a .yaml extension: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::{BasicBlock, BinaryContext, BinaryFunction, ProfileFlags, ProfileReader};
    use tempfile::NamedTempFile;

    fn context(flags: [ProfileFlags; 2]) -> BinaryContext {
        BinaryContext::new(
            "a.out",
            None,
            vec![
                BinaryFunction::new("a", 1, 0x1000, vec![BasicBlock::new(0, vec![]).with_execution_count(1)])
                    .with_profile(flags[0], 1),
                BinaryFunction::new("b", 2, 0x2000, vec![BasicBlock::new(0, vec![]).with_execution_count(1)])
                    .with_profile(flags[1], 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_write_profile() {
        let temp_file = NamedTempFile::new().unwrap();
        let ctx = context([ProfileFlags::SAMPLE, ProfileFlags::SAMPLE]);

        let summary = write_profile(&ctx, &ProfileReader::new("perf"), temp_file.path()).unwrap();
        assert_eq!(summary.functions, 2);
        assert_eq!(summary.blocks, 2);

        let text = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(text.contains("profile-version: 1"));
        assert!(text.contains("binary-name: a.out"));
        assert!(text.contains("events: 1"));
    }

    #[test]
    fn test_write_profile_unopenable_destination() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing/dir/profile.yaml");
        let ctx = context([ProfileFlags::LBR, ProfileFlags::LBR]);

        let err = write_profile(&ctx, &ProfileReader::new("perf"), &path).unwrap_err();

        match &err {
            OutputError::OpenFailed { path: failed, .. } => assert_eq!(failed, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("profile.yaml"));
        assert!(!path.exists());
    }

    #[test]
    #[should_panic(expected = "consistent profile flags")]
    fn test_write_profile_mixed_flags_panics() {
        let temp_file = NamedTempFile::new().unwrap();
        let ctx = context([ProfileFlags::LBR, ProfileFlags::SAMPLE]);

        let _ = write_profile(&ctx, &ProfileReader::new("perf"), temp_file.path());
    }

    #[test]
    fn test_write_profile_mixed_flags_keeps_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("profile.yaml");
        std::fs::write(&path, "previous profile\n").unwrap();
        let ctx = context([ProfileFlags::LBR, ProfileFlags::SAMPLE]);

        let result = std::panic::catch_unwind(|| {
            let _ = write_profile(&ctx, &ProfileReader::new("perf"), &path);
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous profile\n");
    }

    #[test]
    fn test_validate_path_empty() {
        assert!(validate_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_path(temp_dir.path()).is_err());
    }
}
