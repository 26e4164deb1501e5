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

use std::error::Error;

use util::substitute;

/// Roots of the external dependency trees, set up by the CI init scripts.
pub const ROOT_VARIABLES: [&str; 3] = ["DIST_ROOT_DEPS1", "DIST_ROOT_DEPS2", "DIST_ROOT_DEPS3"];

const SOURCE_ROOT: &str = "{src}";
const DEPS2: &str = "{deps2}";
const DEPS3: &str = "{deps3}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn host() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    /// Converts a path on this platform to the forward-slash form the
    /// generated projects use. Only Windows paths change.
    pub fn posix_path(self, path: &str) -> String {
        match self {
            Platform::Windows => path.replace('\\', "/").replace("c:", "C:"),
            Platform::Unix => path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRoots {
    pub deps1: String,
    pub deps2: String,
    pub deps3: String,
}

impl DependencyRoots {
    pub fn from_environment(platform: Platform) -> Result<Self, Box<dyn Error>> {
        Self::from_lookup(platform, |name| std::env::var(name).ok())
    }

    pub fn from_lookup(
        platform: Platform,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, Box<dyn Error>> {
        let root = |name: &str| -> Result<String, Box<dyn Error>> {
            match lookup(name).filter(|value| !value.is_empty()) {
                Some(value) => Ok(platform.posix_path(&value)),
                None => Err(format!(
                    "{} is not set; please first run %CI_ENV_ROOT%\\scripts\\ci\\ci-init-env.bat \
                     or $CI_ENV_ROOT/scripts/ci/ci-init-env.sh",
                    name
                ))?,
            }
        };

        Ok(Self {
            deps1: root(ROOT_VARIABLES[0])?,
            deps2: root(ROOT_VARIABLES[1])?,
            deps3: root(ROOT_VARIABLES[2])?,
        })
    }
}

/// A make configuration: the variables passed to make and the include
/// directories the indexer should search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub name: String,
    pub variables: String,
    pub includes: Vec<String>,
}

struct ConfigurationTemplate {
    name: &'static str,
    variables: &'static str,
    includes: &'static [&'static str],
}

pub fn build_configurations(
    platform: Platform,
    roots: &DependencyRoots,
    source_root: &str,
) -> Vec<BuildConfiguration> {
    let templates = match platform {
        Platform::Unix => UNIX_CONFIGURATIONS,
        Platform::Windows => WINDOWS_CONFIGURATIONS,
    };

    let replacements = [
        (SOURCE_ROOT, source_root),
        (DEPS2, roots.deps2.as_str()),
        (DEPS3, roots.deps3.as_str()),
    ];

    templates
        .iter()
        .map(|template| BuildConfiguration {
            name: template.name.to_string(),
            variables: template.variables.to_string(),
            includes: template
                .includes
                .iter()
                .map(|include| substitute(include, &replacements))
                .collect(),
        })
        .collect()
}

// TODO: the include lists duplicate what the makefiles already know; have
// make print them per toolchain and read that instead.
const UNIX_CONFIGURATIONS: &[ConfigurationTemplate] = &[
    ConfigurationTemplate {
        name: "gcc492",
        variables: "TOOLCHAIN=gcc492",
        includes: &[
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/lib/gcc/x86_64-unknown-linux-gnu/4.9.2/include",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/lib/gcc/x86_64-unknown-linux-gnu/4.9.2/include-fixed",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/include/c++/4.9.2",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/include/c++/4.9.2/x86_64-unknown-linux-gnu",
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/boost/1.58.0-devenv2/ub14-x64-gcc492/include",
            "{deps3}/openssl/1.0.2d-devenv2/ub14-x64-gcc492-debug/include",
            "{deps2}/json-spirit/4.08/source",
        ],
    },
    ConfigurationTemplate {
        name: "clang35",
        variables: "TOOLCHAIN=clang35",
        includes: &[
            "{deps3}/toolchain-clang/3.5/ub14-x64-clang35-release/lib/clang/3.5.0/include",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/lib/gcc/x86_64-unknown-linux-gnu/4.9.2/include",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/lib/gcc/x86_64-unknown-linux-gnu/4.9.2/include-fixed",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/include/c++/4.9.2",
            "{deps3}/toolchain-gcc/4.9.2/ub14-x64-gcc492-release/include/c++/4.9.2/x86_64-unknown-linux-gnu",
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/boost/1.58.0-devenv2/ub14-x64-gcc492/include",
            "{deps3}/openssl/1.0.2d-devenv2/ub14-x64-gcc492-debug/include",
            "{deps2}/json-spirit/4.08/source",
        ],
    },
    ConfigurationTemplate {
        name: "gcc630",
        variables: "TOOLCHAIN=gcc630",
        includes: &[
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/lib/gcc/x86_64-pc-linux-gnu/6.3.0/include",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/lib/gcc/x86_64-pc-linux-gnu/6.3.0/include-fixed",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/include/c++/6.3.0",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/include/c++/6.3.0/x86_64-pc-linux-gnu",
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/boost/1.63.0/ub16-x64-gcc630/include",
            "{deps3}/openssl/1.1.0d/source",
            "{deps3}/openssl/1.1.0d/ub16-x64-gcc630-debug/include",
            "{deps3}/json-spirit/4.08/source",
        ],
    },
    ConfigurationTemplate {
        name: "clang391",
        variables: "TOOLCHAIN=clang391",
        includes: &[
            "{deps3}/toolchain-clang/3.9.1/ub16-x64-clang391-release/lib/clang/3.9.1/include",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/lib/gcc/x86_64-pc-linux-gnu/6.3.0/include",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/lib/gcc/x86_64-pc-linux-gnu/6.3.0/include-fixed",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/include/c++/6.3.0",
            "{deps3}/toolchain-gcc/6.3.0/ub16-x64-gcc630-release/include/c++/6.3.0/x86_64-pc-linux-gnu",
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/boost/1.63.0/ub16-x64-gcc630/include",
            "{deps3}/openssl/1.1.0d/source",
            "{deps3}/openssl/1.1.0d/ub16-x64-gcc630-debug/include",
            "{deps3}/json-spirit/4.08/source",
        ],
    },
    ConfigurationTemplate {
        name: "clang730",
        variables: "TOOLCHAIN=clang730",
        includes: &[
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/boost/1.63.0/d156-x64-clang730/include",
            "{deps3}/openssl/1.1.0d/source",
            "{deps3}/openssl/1.1.0d/d156-x64-clang730-debug/include",
            "{deps3}/json-spirit/4.08/source",
        ],
    },
];

const WINDOWS_CONFIGURATIONS: &[ConfigurationTemplate] = &[
    ConfigurationTemplate {
        name: "vc12",
        variables: "ARCH=x64 TOOLCHAIN=vc12",
        includes: &[
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/toolchain-msvc/vc12-update4/default/VC/include",
            "{deps3}/winsdk/8.1/default/Include",
            "{deps3}/openssl/1.0.2d-devenv2/win7-x64-vc12-debug/include",
            "{deps3}/boost/1.58.0-devenv2/win7-x64-vc12/include",
            "{deps2}/json-spirit/4.08/source",
        ],
    },
    ConfigurationTemplate {
        name: "vc1232",
        variables: "ARCH=x86 TOOLCHAIN=vc12",
        includes: &[
            "{src}/src/versioning",
            "{src}/src/include",
            "{src}/src/local",
            "{src}/src/utests/include",
            "{deps3}/toolchain-msvc/vc12-update4/default/VC/include",
            "{deps3}/winsdk/8.1/default/Include",
            "{deps3}/openssl/1.0.2d-devenv2/win7-x86-vc12-debug/include",
            "{deps3}/boost/1.58.0-devenv2/win7-x86-vc12/include",
            "{deps2}/json-spirit/4.08/source",
        ],
    },
];
