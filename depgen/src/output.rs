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

use std::{fs, io, path::Path};

use log::debug;

use crate::dependencies::DependencySet;

/// A make rule for `target` plus an empty rule per header, so a deleted
/// header does not leave make without a way to build it.
#[derive(Debug, Clone, Copy)]
pub struct DependencyFile<'a> {
    target: &'a Path,
    dependencies: &'a DependencySet,
}

impl<'a> DependencyFile<'a> {
    pub fn new(target: &'a Path, dependencies: &'a DependencySet) -> Self {
        Self {
            target,
            dependencies,
        }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        debug!(
            "writing {} dependencies of {} to {}",
            self.dependencies.len(),
            self.target.display(),
            path.display()
        );

        fs::write(path, self.to_bytes())
    }

    /// Header paths are written back byte for byte, whatever their encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = escape(&path_bytes(self.target));
        result.extend_from_slice(b": \\\n");

        for dependency in self.dependencies.iter() {
            result.push(b' ');
            result.extend(escape(dependency));
            result.extend_from_slice(b" \\\n");
        }

        result.extend_from_slice(b"\n\n");

        for dependency in self.dependencies.iter() {
            result.extend(escape(dependency));
            result.extend_from_slice(b":\n");
        }

        result
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;

    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().into_owned().into_bytes()
}

fn escape(path: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(path.len());
    for &byte in path {
        if byte == b' ' {
            result.push(b'\\');
        }
        result.push(byte);
    }
    result
}
