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
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    configuration::BuildConfiguration,
    registry::Registry,
    template::{ProjectContext, CPROJECT_TEMPLATE, PROJECT_TEMPLATE},
};

pub const PROJECT_FILE: &str = ".project";
pub const CPROJECT_FILE: &str = ".cproject";

#[derive(Debug, Clone)]
pub struct Generator {
    source_root: String,
    output_directory: PathBuf,
    configurations: Vec<BuildConfiguration>,
}

impl Generator {
    pub fn new(
        source_root: impl Into<String>,
        output_directory: impl Into<PathBuf>,
        configurations: Vec<BuildConfiguration>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_directory: output_directory.into(),
            configurations,
        }
    }

    /// Writes `.project` and `.cproject` for every project that links at
    /// least one resource, once per build configuration. Returns the
    /// directories written to.
    pub fn generate(&self, registry: &Registry) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        fs::create_dir_all(&self.output_directory)?;
        info!(
            "outputting configuration files to '{}'",
            self.output_directory.display()
        );

        let mut written = vec![];
        for (project, resources) in registry.projects() {
            info!("producing configurations for project '{}'", project);
            if resources.is_empty() {
                continue;
            }

            for configuration in &self.configurations {
                info!(
                    "producing '{}' configuration for '{}'",
                    configuration.name, project
                );
                written.push(self.emit(project, resources, configuration)?);
            }
        }

        Ok(written)
    }

    fn emit(
        &self,
        project: &str,
        resources: &[String],
        configuration: &BuildConfiguration,
    ) -> Result<PathBuf, Box<dyn Error>> {
        let directory = self
            .output_directory
            .join(project)
            .join(&configuration.name);
        info!("creating configuration files in '{}'", directory.display());
        fs::create_dir_all(&directory)?;

        let context = self.context(project, resources, configuration);
        write_file(&directory.join(PROJECT_FILE), &context.render(PROJECT_TEMPLATE))?;
        write_file(&directory.join(CPROJECT_FILE), &context.render(CPROJECT_TEMPLATE))?;

        Ok(directory)
    }

    fn context(
        &self,
        project: &str,
        resources: &[String],
        configuration: &BuildConfiguration,
    ) -> ProjectContext {
        let name = project.rsplit('/').next().unwrap_or(project).to_string();

        let mut resources = resources.to_vec();
        resources.push(format!("src/{}", project));

        ProjectContext {
            build_settings: format!("{} {}", configuration.variables, name),
            name,
            source_root: self.source_root.clone(),
            resources,
            includes: configuration.includes.clone(),
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn Error>> {
    info!("generating file '{}'", path.display());
    fs::write(path, content)
        .map_err(|error| format!("unable to write {}: {}", path.display(), error))?;
    Ok(())
}
