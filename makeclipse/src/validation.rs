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

use crate::registry::Registry;

/// Checks that every registered project and every resource it links still
/// exists. Returns one message per problem.
pub fn validate_projects(registry: &Registry, source_root: &Path) -> Vec<String> {
    let sources = source_root.join("src");
    let mut problems = vec![];

    for (project, resources) in registry.projects() {
        let directory = sources.join(project);
        if !directory.exists() {
            problems.push(format!(
                "project source code directory '{}' doesn't appear to exist - the source tree might have changed",
                directory.display()
            ));
        }

        for resource in resources {
            let location = source_root.join(resource);
            if !location.exists() {
                problems.push(format!(
                    "resource '{}' linked to project '{}' doesn't appear to exist - the source tree might have changed",
                    location.display(),
                    project
                ));
            }
        }
    }

    problems
}

/// Checks that everything inside the monitored directories is registered, so
/// new projects are not silently left out. Monitored directories that do not
/// exist are skipped.
pub fn validate_monitored(registry: &Registry, source_root: &Path) -> io::Result<Vec<String>> {
    let sources = source_root.join("src");
    let mut problems = vec![];

    for monitored in &registry.monitored {
        let directory = sources.join(monitored);
        if !directory.exists() {
            continue;
        }

        let mut entries = fs::read_dir(&directory)?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();

        for entry in entries {
            let project = format!("{}/{}", monitored, entry);
            if !registry.contains(&project) {
                problems.push(format!(
                    "project '{}' is not known, please add it to the project registry",
                    project
                ));
            }
        }
    }

    Ok(problems)
}
