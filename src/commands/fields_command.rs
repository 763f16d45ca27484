//! Camera field summary command
//!
//! Prints the common camera fields (make, model, timestamps, exposure,
//! GPS, lens, shutter count) of each input file.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::ExifKit;
use crate::commands::command_traits::{exif_kit_from_args, inputs_from_args, run_for_each, Command};
use crate::tiff::errors::TiffResult;

/// Command for summarising EXIF fields
pub struct FieldsCommand {
    /// Files to read
    files: Vec<PathBuf>,
    kit: ExifKit,
}

impl FieldsCommand {
    /// Create a new fields command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    ///
    /// # Returns
    /// A new FieldsCommand instance or an error
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(FieldsCommand {
            files: inputs_from_args(args)?,
            kit: exif_kit_from_args(args)?,
        })
    }
}

impl Command for FieldsCommand {
    fn execute(&self) -> TiffResult<()> {
        info!("Summarising {} files", self.files.len());
        run_for_each(&self.files, "Reading EXIF", |path| {
            let info = self.kit.read_file(path)?;
            self.kit.summary(&info)
        })
    }
}
