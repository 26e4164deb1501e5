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

use std::path::{Path, PathBuf};

pub const PID: &str = "{pid}";
pub const TEST_NAME: &str = "{testname}";
pub const TEST_FILE: &str = "{testfile}";
pub const TEST_DIR: &str = "{testdir}";
pub const DUMP_FILE: &str = "{dumpfile}";

/// Where the OS leaves a crash dump and how to get a backtrace out of it.
///
/// Both fields are templates over the placeholders above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub dump_file: String,
    pub debugger: Vec<String>,
}

impl Configuration {
    pub fn for_host() -> Self {
        if cfg!(windows) {
            let local_app_data = std::env::var_os("LOCALAPPDATA")
                .map(PathBuf::from)
                .unwrap_or_default();
            Self::windows(local_app_data)
        } else {
            Self::unix()
        }
    }

    /// Core files named after the pid, read back with gdb.
    ///
    /// Core dumps have to be enabled (`ulimit -c`, `/etc/security/limits.conf`)
    /// and `kernel.core_uses_pid` set for the file to show up here.
    pub fn unix() -> Self {
        Self {
            dump_file: format!("core.{}", PID),
            debugger: vec![
                "gdb".to_string(),
                "--batch".to_string(),
                "-ex".to_string(),
                "thread apply all bt".to_string(),
                "-ex".to_string(),
                "quit".to_string(),
                TEST_FILE.to_string(),
                DUMP_FILE.to_string(),
            ],
        }
    }

    /// User-mode dumps collected by Windows Error Reporting, read back with cdb.
    pub fn windows(local_app_data: impl AsRef<Path>) -> Self {
        let dump_file = local_app_data
            .as_ref()
            .join("CrashDumps")
            .join(format!("{}.{}.dmp", TEST_NAME, PID));

        Self {
            dump_file: dump_file.to_string_lossy().into_owned(),
            debugger: vec![
                "cdb".to_string(),
                "-c".to_string(),
                "!analyze -v; q".to_string(),
                "-z".to_string(),
                DUMP_FILE.to_string(),
            ],
        }
    }
}
