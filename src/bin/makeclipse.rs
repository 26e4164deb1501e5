use std::{error::Error, path::PathBuf};

use clap::{crate_version, App, Arg};
use log::{error, info};

use bltools::init_logging;
use makeclipse::{configuration::DependencyRoots, registry::Registry, Options};

/// Info and up.
const DEFAULT_VERBOSITY: usize = 2;

fn main() {
    if let Err(error) = run() {
        error!("{}", error);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let matches = App::new("makeclipse")
        .version(crate_version!())
        .about("Emits Eclipse configuration files for make projects")
        .arg(
            Arg::with_name("outputDirectory")
                .short("o")
                .long("outputDirectory")
                .takes_value(true)
                .help("Directory where configurations will be output (e.g., your Eclipse workspace)"),
        )
        .arg(
            Arg::with_name("sourceRoot")
                .short("s")
                .long("sourceRoot")
                .takes_value(true)
                .help("Top of the source tree [default: current directory]"),
        )
        .arg(
            Arg::with_name("registry")
                .short("r")
                .long("registry")
                .takes_value(true)
                .help("JSON file replacing the built-in project registry"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increases log verbosity"),
        )
        .get_matches();

    init_logging(
        &["makeclipse", module_path!()],
        DEFAULT_VERBOSITY + matches.occurrences_of("verbose") as usize,
    )?;

    let source_root = match matches.value_of("sourceRoot") {
        Some(directory) => PathBuf::from(directory),
        None => std::env::current_dir()?,
    };

    let mut options = Options::new(source_root);
    options.output_directory = matches.value_of("outputDirectory").map(PathBuf::from);
    if let Some(path) = matches.value_of("registry") {
        options.registry = Registry::load(path.as_ref())?;
    }

    let roots = DependencyRoots::from_environment(options.platform)?;

    let written = makeclipse::run(&options, &roots)?;
    info!("wrote {} project configurations", written.len());

    Ok(())
}
