use std::{error::Error, io};

use log::error;

use bltools::{init_logging, verbosity_from_environment};
use depgen::configuration::Configuration;

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
    init_logging(&["depgen", "util", module_path!()], verbosity_from_environment())?;

    let mut arguments = std::env::args();
    let program = arguments.next().unwrap_or_default();

    let configuration = Configuration::from_environment(&program);
    depgen::run(&configuration, arguments, &mut io::stdout().lock())
}
