//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application, and the input handling the commands share.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ArgMatches;
use log::{debug, error};

use crate::api::ExifKit;
use crate::exif::{ParseOptions, DEFAULT_MAX_EXIF_SIZE};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::utils::progress::ProgressTracker;

/// File extensions picked up when a directory is given as input
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "heic", "nef"];

/// Represents an executable command in the application
///
/// Command objects encapsulate the logic for a specific CLI operation,
/// allowing for separation of concerns and better testability.
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> TiffResult<()>;
}

/// Factory for creating commands from CLI arguments
///
/// This trait defines the interface for command factories
/// which can parse CLI arguments and create the appropriate Command.
pub trait CommandFactory {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &ArgMatches) -> TiffResult<Box<dyn Command>>;
}

/// Returns true if `path` has one of the supported image extensions
pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expands the inputs into a list of files
///
/// Files are taken as given. Directories contribute their supported files,
/// sorted by name, without descending into subdirectories.
pub fn collect_inputs(inputs: &[String]) -> TiffResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let path = PathBuf::from(input);
        if !path.is_dir() {
            files.push(path);
            continue;
        }

        let mut found = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry_path = entry?.path();
            if entry_path.is_file() && is_supported_file(&entry_path) {
                found.push(entry_path);
            }
        }
        found.sort();
        debug!("{}: {} supported files", path.display(), found.len());
        files.extend(found);
    }

    Ok(files)
}

/// Builds the library facade from the parse option flags
pub fn exif_kit_from_args(args: &ArgMatches) -> TiffResult<ExifKit> {
    let max_exif_size = match args.get_one::<String>("max-size") {
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| TiffError::GenericError(format!("Invalid maximum EXIF size: {}", value)))?,
        None => DEFAULT_MAX_EXIF_SIZE,
    };

    Ok(ExifKit::with_options(ParseOptions {
        strict: args.get_flag("strict"),
        max_exif_size,
    }))
}

/// Input files named on the command line
pub fn inputs_from_args(args: &ArgMatches) -> TiffResult<Vec<PathBuf>> {
    let inputs: Vec<String> = args
        .get_many::<String>("input")
        .ok_or_else(|| TiffError::GenericError("Missing input file".to_string()))?
        .cloned()
        .collect();

    let files = collect_inputs(&inputs)?;
    if files.is_empty() {
        return Err(TiffError::GenericError("No supported input files found".to_string()));
    }
    Ok(files)
}

/// Runs `report` on every file and prints what it returns
///
/// A failing file is reported and the run continues; the run fails if any
/// file failed.
pub fn run_for_each<F>(files: &[PathBuf], description: &str, mut report: F) -> TiffResult<()>
where
    F: FnMut(&Path) -> TiffResult<String>,
{
    let progress = ProgressTracker::new(files.len() as u64, description);
    let mut failures = 0;

    for file in files {
        progress.set_message(&file.display().to_string());
        match report(file) {
            Ok(text) => {
                progress.println(&format!("{}:", file.display()));
                progress.println(text.trim_end());
            }
            Err(e) => {
                error!("{}: {}", file.display(), e);
                progress.println(&format!("{}: error: {}", file.display(), e));
                failures += 1;
            }
        }
        progress.increment(1);
    }
    progress.finish();

    if failures > 0 {
        return Err(TiffError::GenericError(format!(
            "{} of {} files failed",
            failures,
            files.len()
        )));
    }
    Ok(())
}
