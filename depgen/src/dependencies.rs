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

use std::collections::HashSet;

/// Header paths in the order the compiler first reported them.
///
/// Paths are kept as the compiler printed them, in its console code page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    paths: Vec<Vec<u8>>,
    seen: HashSet<Vec<u8>>,
}

impl DependencySet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `false` if the path was already present.
    pub fn insert(&mut self, path: impl Into<Vec<u8>>) -> bool {
        let path = path.into();
        if self.seen.contains(&path) {
            return false;
        }

        self.seen.insert(path.clone());
        self.paths.push(path);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.paths.iter().map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Splits compiler output into include notices and everything else.
#[derive(Debug, Clone)]
pub struct IncludeScanner<'a> {
    prefix: &'a [u8],
    dependencies: DependencySet,
}

impl<'a> IncludeScanner<'a> {
    pub fn new(prefix: &'a str) -> Self {
        Self {
            prefix: prefix.as_bytes(),
            dependencies: DependencySet::new(),
        }
    }

    /// Swallows include notices and hands every other line back for echoing.
    pub fn scan_line<'l>(&mut self, line: &'l [u8]) -> Option<&'l [u8]> {
        match line.strip_prefix(self.prefix) {
            Some(path) => {
                let path = path.trim_ascii();
                if !path.is_empty() {
                    self.dependencies.insert(path);
                }
                None
            }
            None => Some(line),
        }
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub fn into_dependencies(self) -> DependencySet {
        self.dependencies
    }
}
