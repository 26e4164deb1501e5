/*
   This file is part of bltools.

   bltools is a collection of build and CI helpers for the baselib tree.

   bltools is free software: you can redistribute it and/or modify
   it under the terms of the GNU General Public License as published by
   the Free Software Foundation, either version 3 of the License, or
   (at your option) any later version.

   bltools is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
   GNU General Public License for more details.

   You should have received a copy of the GNU General Public License
   along with bltools.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{error::Error, io::Write};

use log::debug;

use util::{exit_code, for_each_line, ProcessCreator};

pub mod arguments;
pub mod configuration;
pub mod dependencies;
pub mod output;

use crate::{
    arguments::parse_arguments, configuration::Configuration, dependencies::IncludeScanner,
    output::DependencyFile,
};

/// Runs the compiler for `arguments` and returns the code to exit with.
///
/// Compiler output other than include notices goes to `echo`. The dependency
/// file is only written when it was asked for and the compiler succeeded.
pub fn run<I, A>(
    configuration: &Configuration,
    arguments: I,
    echo: &mut dyn Write,
) -> Result<i32, Box<dyn Error>>
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
{
    let invocation = parse_arguments(arguments, configuration)?;
    debug!("{:?}", invocation);

    let command_line = std::iter::once(&configuration.compiler).chain(&invocation.arguments);
    let mut process = ProcessCreator::new_with_arguments(command_line)
        .merge_output(true)
        .create()?;

    let mut scanner = IncludeScanner::new(&configuration.include_prefix);
    if let Some(output) = process.take_output() {
        for_each_line(output, |line| match scanner.scan_line(line) {
            Some(line) => {
                echo.write_all(line)?;
                echo.write_all(b"\n")
            }
            None => Ok(()),
        })?;
    }

    let exit_code = exit_code(process.wait()?);
    debug!("{} exited with {}", configuration.compiler, exit_code);

    if exit_code == 0 {
        if let (Some(target), Some(path)) = (&invocation.target, invocation.dependency_file()) {
            DependencyFile::new(target, scanner.dependencies()).write(path)?;
        }
    }

    Ok(exit_code)
}
