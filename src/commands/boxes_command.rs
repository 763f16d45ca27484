//! ISO-BMFF box tree command
//!
//! Lists the box hierarchy of HEIC (or other ISO-BMFF) files, with the
//! typed fields of the boxes that have a decoder.

use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::ExifKit;
use crate::commands::command_traits::{inputs_from_args, run_for_each, Command};
use crate::tiff::errors::TiffResult;

/// Command for printing box trees
pub struct BoxesCommand {
    files: Vec<PathBuf>,
    kit: ExifKit,
}

impl BoxesCommand {
    pub fn new(args: &ArgMatches) -> TiffResult<Self> {
        Ok(BoxesCommand {
            files: inputs_from_args(args)?,
            kit: ExifKit::new(),
        })
    }
}

impl Command for BoxesCommand {
    fn execute(&self) -> TiffResult<()> {
        info!("Listing boxes of {} files", self.files.len());
        run_for_each(&self.files, "Listing boxes", |path| self.kit.boxes(path))
    }
}
