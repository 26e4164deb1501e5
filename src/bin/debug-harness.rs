use std::{error::Error, io};

use clap::{crate_version, App, AppSettings, Arg};
use log::error;

use bltools::{init_logging, verbosity_from_environment};
use harness::{configuration::Configuration, crash_dump::ProcessDebugger};

fn main() {
    std::process::exit(match run() {
        Ok(code) => code,
        Err(error) => {
            error!("{}", error);
            1
        }
    });
}

fn run() -> Result<i32, Box<dyn Error>> {
    let matches = App::new("debug-harness")
        .version(crate_version!())
        .about("Runs a test, flags its failures and debugs its crash dump")
        .setting(AppSettings::TrailingVarArg)
        .arg(
            Arg::with_name("command")
                .help("Test to run, followed by its arguments")
                .required(true)
                .multiple(true)
                .allow_hyphen_values(true),
        )
        .get_matches();

    init_logging(&["harness", "util", module_path!()], verbosity_from_environment())?;

    let arguments: Vec<String> = matches
        .values_of("command")
        .map(|values| values.map(str::to_string).collect())
        .unwrap_or_default();

    harness::run(
        &Configuration::for_host(),
        &ProcessDebugger,
        &arguments,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}
