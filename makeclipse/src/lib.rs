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
    path::{self, PathBuf},
};

use log::{error, info};

pub mod configuration;
pub mod generator;
pub mod registry;
pub mod template;
pub mod validation;

use crate::{
    configuration::{build_configurations, DependencyRoots, Platform},
    generator::Generator,
    registry::Registry,
    validation::{validate_monitored, validate_projects},
};

#[derive(Debug, Clone)]
pub struct Options {
    pub source_root: PathBuf,
    /// Defaults to `bld/makeclipse` under the source root.
    pub output_directory: Option<PathBuf>,
    pub registry: Registry,
    pub platform: Platform,
}

impl Options {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            output_directory: None,
            registry: Registry::default(),
            platform: Platform::host(),
        }
    }
}

/// Validates the registry against the source tree and, when it matches,
/// writes the Eclipse projects. Nothing is written unless validation passes.
pub fn run(options: &Options, roots: &DependencyRoots) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let source_root = path::absolute(&options.source_root)?;
    info!("source code directory '{}'", source_root.join("src").display());

    check(validate_projects(&options.registry, &source_root))?;
    check(validate_monitored(&options.registry, &source_root)?)?;

    let output_directory = match &options.output_directory {
        Some(directory) => path::absolute(directory)?,
        None => source_root.join("bld").join("makeclipse"),
    };

    let source_root = options.platform.posix_path(&source_root.to_string_lossy());
    let configurations = build_configurations(options.platform, roots, &source_root);

    Generator::new(source_root, output_directory, configurations).generate(&options.registry)
}

fn check(problems: Vec<String>) -> Result<(), Box<dyn Error>> {
    if problems.is_empty() {
        return Ok(());
    }

    for problem in &problems {
        error!("{}", problem);
    }
    Err("errors validating the project registry, cannot proceed")?
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, fs, path::Path};

    use super::{run, Options};
    use crate::{
        configuration::{DependencyRoots, Platform},
        registry::Registry,
    };

    fn roots() -> DependencyRoots {
        DependencyRoots {
            deps1: "/deps1".to_string(),
            deps2: "/deps2".to_string(),
            deps3: "/deps3".to_string(),
        }
    }

    fn options(root: &Path) -> Options {
        let mut projects = BTreeMap::new();
        projects.insert(
            "apps/bl-tool".to_string(),
            vec!["src/include".to_string()],
        );
        projects.insert("utests/include".to_string(), vec![]);

        Options {
            source_root: root.to_path_buf(),
            output_directory: None,
            registry: Registry {
                monitored: vec!["apps".to_string(), "utests".to_string()],
                projects,
            },
            platform: Platform::Unix,
        }
    }

    fn create_tree(root: &Path) {
        for directory in &["src/apps/bl-tool", "src/utests/include", "src/include"] {
            fs::create_dir_all(root.join(directory)).unwrap();
        }
    }

    #[test]
    fn generates_into_default_directory() {
        let root = tempfile::tempdir().unwrap();
        create_tree(root.path());

        let written = run(&options(root.path()), &roots()).unwrap();

        let output = root.path().join("bld").join("makeclipse");
        assert_eq!(5, written.len());
        assert!(output.join("apps/bl-tool/gcc492/.project").exists());
        assert!(output.join("apps/bl-tool/clang730/.cproject").exists());
        assert!(!output.join("utests").exists());

        let cproject =
            fs::read_to_string(output.join("apps/bl-tool/gcc630/.cproject")).unwrap();
        assert!(cproject.contains("&quot;/deps3/boost/1.63.0/ub16-x64-gcc630/include&quot;"));
        assert!(cproject.contains(&format!(
            "buildPath=\"{}\"",
            root.path().to_string_lossy()
        )));
    }

    #[test]
    fn explicit_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let workspace = tempfile::tempdir().unwrap();
        create_tree(root.path());

        let mut options = options(root.path());
        options.output_directory = Some(workspace.path().join("eclipse"));
        options.platform = Platform::Windows;

        run(&options, &roots()).unwrap();

        assert!(workspace
            .path()
            .join("eclipse/apps/bl-tool/vc1232/.project")
            .exists());
        assert!(!root.path().join("bld").exists());
    }

    #[test]
    fn missing_project_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("src/include")).unwrap();

        assert!(run(&options(root.path()), &roots()).is_err());
        assert!(!root.path().join("bld").exists());
    }

    #[test]
    fn unregistered_project_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        create_tree(root.path());
        fs::create_dir_all(root.path().join("src/apps/bl-new")).unwrap();

        assert!(run(&options(root.path()), &roots()).is_err());
        assert!(!root.path().join("bld").exists());
    }
}
