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

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use crate::configuration::Configuration;

/// A compiler command line with the wrapper's own options taken out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// What the compiler gets, in order, including the injected trace flag.
    pub arguments: Vec<String>,
    pub dependencies: bool,
    pub target: Option<PathBuf>,
}

impl Invocation {
    /// `<target>.d`, present only when dependency tracking was asked for.
    pub fn dependency_file(&self) -> Option<PathBuf> {
        if !self.dependencies {
            return None;
        }

        self.target
            .as_ref()
            .map(|target| target.with_extension("d"))
    }
}

pub fn parse_arguments<I, A>(
    arguments: I,
    configuration: &Configuration,
) -> Result<Invocation, Box<dyn Error>>
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
{
    let mut invocation = Invocation::default();

    let mut iterator = arguments
        .into_iter()
        .map(|argument| argument.as_ref().to_string());

    while let Some(argument) = iterator.next() {
        if argument == "-M" {
            invocation.dependencies = true;
            invocation.arguments.push(configuration.trace_flag.clone());
        } else if let Some(value) = argument.strip_prefix("-F") {
            let value = if value.is_empty() {
                iterator.next().ok_or("Option -F requires an argument.")?
            } else {
                value.to_string()
            };

            if let Some(target) = value.strip_prefix('o') {
                if !target.is_empty() {
                    invocation.target = Some(PathBuf::from(target));
                }
            }

            invocation.arguments.push(format!("-F{}", value));
        } else {
            invocation.arguments.push(argument);
        }
    }

    if invocation.dependencies && invocation.target.is_none() {
        let source = invocation
            .arguments
            .iter()
            .find(|argument| !argument.is_empty() && !looks_like_flag(argument))
            .ok_or("Cannot infer the target: no source file on the command line.")?;

        invocation.target = Some(Path::new(source).with_extension("obj"));
    }

    Ok(invocation)
}

// cl.exe accepts both spellings
fn looks_like_flag(argument: &str) -> bool {
    argument.starts_with('-') || argument.starts_with('/')
}
