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

use std::{collections::BTreeMap, error::Error, fs, path::Path};

use serde::{Deserialize, Serialize};

const LIBRARY_RESOURCES: &[&str] = &["src/include", "src/versioning", "src/local", "notes"];
const TEST_RESOURCES: &[&str] = &[
    "src/include",
    "src/versioning",
    "src/local",
    "src/utests/include",
    "notes",
];

const TEST_SUITES: &[&str] = &[
    "utests/utf_baselib",
    "utests/utf_baselib_async",
    "utests/utf_baselib_basictask",
    "utests/utf_baselib_blobtransfer",
    "utests/utf_baselib_cmdline",
    "utests/utf_baselib_data",
    "utests/utf_baselib_http",
    "utests/utf_baselib_io",
    "utests/utf_baselib_jni",
    "utests/utf_baselib_loader",
    "utests/utf_baselib_messaging",
    "utests/utf_baselib_parsing",
    "utests/utf_baselib_plugin",
    "utests/utf_baselib_rest",
    "utests/utf_baselib_security",
    "utests/utf_baselib_setprio",
    "utests/utf_baselib_tasks",
    "utests/utf_baselib_utils",
];

/// The projects that get Eclipse configurations, keyed by their path under
/// `src`, with the source tree directories each one links in.
///
/// A project with no linked resources is known but gets no configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    /// Directories under `src` whose every entry must be a registered project.
    pub monitored: Vec<String>,
    pub projects: BTreeMap<String, Vec<String>>,
}

impl Default for Registry {
    fn default() -> Self {
        let owned = |resources: &[&str]| -> Vec<String> {
            resources.iter().map(|resource| resource.to_string()).collect()
        };

        let mut projects = BTreeMap::new();
        projects.insert(
            "apps/bl-messaging-broker".to_string(),
            owned(LIBRARY_RESOURCES),
        );
        projects.insert("apps/bl-tool".to_string(), owned(LIBRARY_RESOURCES));
        projects.insert("utests/include".to_string(), vec![]);
        for suite in TEST_SUITES {
            projects.insert(suite.to_string(), owned(TEST_RESOURCES));
        }

        Self {
            monitored: owned(&["apps", "plugins", "utests"]),
            projects,
        }
    }
}

impl Registry {
    pub fn from_json(input: impl AsRef<str>) -> Result<Self, Box<dyn Error>> {
        let result: Registry = serde_json::from_str(input.as_ref())?;

        for (project, resources) in &result.projects {
            if project.is_empty() {
                return Err("Project name is empty string.")?;
            }
            if resources.iter().any(|resource| resource.is_empty()) {
                return Err(format!("Project '{}' links an empty resource.", project))?;
            }
        }

        Ok(result)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)
            .map_err(|error| format!("unable to read {}: {}", path.display(), error))?;
        Self::from_json(content)
    }

    pub fn projects(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.projects
            .iter()
            .map(|(project, resources)| (project.as_str(), resources.as_slice()))
    }

    pub fn contains(&self, project: &str) -> bool {
        self.projects.contains_key(project)
    }
}

#[cfg(test)]
mod tests {
    use super::Registry;

    #[test]
    fn built_in_registry() {
        let sut = Registry::default();

        assert_eq!(vec!["apps", "plugins", "utests"], sut.monitored);
        assert!(sut.contains("apps/bl-tool"));
        assert!(sut.contains("utests/utf_baselib_tasks"));
        assert!(!sut.contains("utests/unknown"));
        assert_eq!(Some(&vec![]), sut.projects.get("utests/include"));
        assert_eq!(
            Some(&"src/utests/include".to_string()),
            sut.projects["utests/utf_baselib"].get(3)
        );
    }

    #[test]
    fn projects_are_sorted() {
        let sut = Registry::default();

        let names: Vec<_> = sut.projects().map(|(name, _)| name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(sorted, names);
    }

    #[test]
    fn from_json() {
        let sut = Registry::from_json(
            r#"{
                "monitored": ["apps"],
                "projects": {
                    "apps/tool": ["src/include", "notes"],
                    "apps/empty": []
                }
            }"#,
        )
        .unwrap();

        assert_eq!(vec!["apps"], sut.monitored);
        assert_eq!(2, sut.projects.len());
        assert_eq!(vec!["src/include", "notes"], sut.projects["apps/tool"]);
    }

    #[test]
    fn from_json_rejects_bad_input() {
        assert!(Registry::from_json("{}").is_err());
        assert!(Registry::from_json(r#"{"monitored": [], "projects": {"": []}}"#).is_err());
        assert!(Registry::from_json(r#"{"monitored": [], "projects": {"apps/a": [""]}}"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("registry.json");

        let message = Registry::load(&path).unwrap_err().to_string();
        assert!(message.contains("registry.json"));
    }
}
