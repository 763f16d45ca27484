use clap::{Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};
use std::process;

use exifkit::commands::{CommandFactory, ExifkitCommandFactory};

fn main() {
    let matches = ClapCommand::new("exifkit")
        .version("1.0")
        .author("Maurice Schilpp")
        .about("Read EXIF metadata from JPEG, HEIC and raw TIFF files")
        .arg(
            Arg::new("input")
                .help("Input files, or directories to scan for .jpg/.jpeg/.heic/.nef files")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump")
                .short('d')
                .long("dump")
                .help("List every IFD entry with its tag name and value")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("boxes")
                .short('b')
                .long("boxes")
                .help("Print the ISO-BMFF box tree")
                .action(ArgAction::SetTrue)
                .conflicts_with("dump"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Fail when an optional IFD (thumbnail, Exif, GPS, maker note) is broken")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("max-size")
                .long("max-size")
                .help("Largest EXIF block to load, in bytes")
                .value_name("BYTES")
                .required(false),
        )
        .get_matches();

    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // RUST_LOG, when set, overrides the level chosen by -v
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let factory = ExifkitCommandFactory::new();

    let command_result = factory.create_command(&matches);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
