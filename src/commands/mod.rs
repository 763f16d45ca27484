//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod fields_command;
pub mod dump_command;
pub mod boxes_command;

pub use command_traits::{Command, CommandFactory};
pub use fields_command::FieldsCommand;
pub use dump_command::DumpCommand;
pub use boxes_command::BoxesCommand;

use clap::ArgMatches;
use crate::tiff::errors::TiffResult;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
#[derive(Default)]
pub struct ExifkitCommandFactory;

impl ExifkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ExifkitCommandFactory
    }
}

impl CommandFactory for ExifkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> TiffResult<Box<dyn Command>> {
        if args.get_flag("boxes") {
            Ok(Box::new(BoxesCommand::new(args)?))
        } else if args.get_flag("dump") {
            Ok(Box::new(DumpCommand::new(args)?))
        } else {
            // Default to the field summary
            Ok(Box::new(FieldsCommand::new(args)?))
        }
    }
}
