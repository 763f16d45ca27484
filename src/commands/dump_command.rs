//! IFD dump command

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::ExifKit;
use crate::commands::command_traits::{exif_kit_from_args, inputs_from_args, run_for_each, Command};
use crate::tiff::errors::TiffResult;

/// Command for listing every decoded IFD entry with its tag name
pub struct DumpCommand {
    files: Vec<PathBuf>,
    kit: ExifKit,
}

impl DumpCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(DumpCommand {
            files: inputs_from_args(args)?,
            kit: exif_kit_from_args(args)?,
        })
    }
}

impl Command for DumpCommand {
    fn execute(&self) -> TiffResult<()> {
        info!("Dumping IFDs of {} files", self.files.len());
        run_for_each(&self.files, "Dumping IFDs", |path| {
            let info = self.kit.read_file(path)?;
            Ok(self.kit.dump(&info))
        })
    }
}
