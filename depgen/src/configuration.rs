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

use std::path::Path;

/// Overrides the compiler that the wrapper runs.
pub const COMPILER_VARIABLE: &str = "DEPGEN_COMPILER";

const PROGRAM_PREFIX: &str = "depgen-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub compiler: String,
    pub include_prefix: String,
    pub trace_flag: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            compiler: "cl".to_string(),
            include_prefix: "Note: including file:".to_string(),
            trace_flag: "-showIncludes".to_string(),
        }
    }
}

impl Configuration {
    /// Picks the compiler for a wrapper started as `program`.
    ///
    /// An explicit `compiler` wins. Otherwise `depgen-<name>` runs `<name>`.
    pub fn new(program: impl AsRef<Path>, compiler: Option<String>) -> Self {
        let compiler = compiler
            .filter(|compiler| !compiler.is_empty())
            .or_else(|| compiler_from_program_name(program))
            .unwrap_or_else(|| Self::default().compiler);

        Self {
            compiler,
            ..Default::default()
        }
    }

    pub fn from_environment(program: impl AsRef<Path>) -> Self {
        Self::new(program, std::env::var(COMPILER_VARIABLE).ok())
    }
}

fn compiler_from_program_name(program: impl AsRef<Path>) -> Option<String> {
    let stem = program.as_ref().file_stem()?.to_string_lossy();
    stem.strip_prefix(PROGRAM_PREFIX)
        .filter(|compiler| !compiler.is_empty())
        .map(str::to_string)
}
